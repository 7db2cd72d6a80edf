use crate::filter::LedgerFilter;
use crate::period::PeriodKey;
use crate::schema::WriteOffSheet;
use log::debug;
use serde::{Deserialize, Serialize};

// Column-name fragments, matched case-insensitively as substrings. Source
// write-off spreadsheets name these columns inconsistently across periods
// (and across languages), so resolution is heuristic by design.
const DATE_HINTS: &[&str] = &["date", "fecha"];
const AMOUNT_HINTS: &[&str] = &["amount", "monto", "valor", "credit", "debit"];
const CUSTOMER_HINTS: &[&str] = &["cust", "vendor", "customer", "name"];

/// Indices into the sheet's declared column sequence, one per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub date: usize,
    pub amount: usize,
    pub customer: Option<usize>,
}

/// Outcome of the one-shot column scan. Unresolved is a non-fatal signal:
/// reconciliation reports zero and the rest of the report proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaResolution {
    Resolved(ColumnRoles),
    Unresolved,
}

fn find_column(columns: &[String], hints: &[&str]) -> Option<usize> {
    columns.iter().position(|name| {
        let lowered = name.to_lowercase();
        hints.iter().any(|hint| lowered.contains(hint))
    })
}

/// Scans the declared column names for the date, amount, and customer
/// columns. The first matching column wins per purpose. A sheet with no
/// date or no amount column is Unresolved; a missing customer column only
/// disables customer-based filtering.
pub fn resolve_columns(columns: &[String]) -> SchemaResolution {
    let date = find_column(columns, DATE_HINTS);
    let amount = find_column(columns, AMOUNT_HINTS);
    let customer = find_column(columns, CUSTOMER_HINTS);

    match (date, amount) {
        (Some(date), Some(amount)) => SchemaResolution::Resolved(ColumnRoles {
            date,
            amount,
            customer,
        }),
        _ => SchemaResolution::Unresolved,
    }
}

/// Write-off total for the active period and client filter, plus whether
/// the sheet's schema could be resolved at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WriteOffSummary {
    pub total: f64,
    pub schema_resolved: bool,
}

impl WriteOffSummary {
    fn zero(schema_resolved: bool) -> Self {
        Self {
            total: 0.0,
            schema_resolved,
        }
    }
}

/// Sums the write-off amounts matching the selected period and client
/// filter. Best-effort by contract: an absent sheet, an unresolvable
/// schema, or a non-finite sum all report zero, never an error.
///
/// Unlike the main ledger, an exact-client filter takes precedence here
/// and the search filter is only consulted when no exact client is set.
pub fn reconcile(
    sheet: Option<&WriteOffSheet>,
    period: PeriodKey,
    filter: &LedgerFilter,
) -> WriteOffSummary {
    let Some(sheet) = sheet else {
        return WriteOffSummary::zero(true);
    };

    let roles = match resolve_columns(&sheet.columns) {
        SchemaResolution::Resolved(roles) => roles,
        SchemaResolution::Unresolved => {
            debug!(
                "write-off schema unresolved; columns were {:?}",
                sheet.columns
            );
            return WriteOffSummary::zero(false);
        }
    };

    let total: f64 = sheet
        .rows
        .iter()
        .filter(|row| {
            if let Some(customer_col) = roles.customer {
                let Some(customer) = row.cell(customer_col).as_text() else {
                    return false;
                };
                let normalized = customer.trim().to_uppercase();
                if normalized.chars().take(3).collect::<String>() == "INT" {
                    return false;
                }
                if let Some(client) = filter.exact_client_name() {
                    if normalized != client.trim().to_uppercase() {
                        return false;
                    }
                } else if let Some(search) = filter.search_text() {
                    if !customer.to_lowercase().contains(&search.to_lowercase()) {
                        return false;
                    }
                }
            }
            match row.cell(roles.date).as_date() {
                Some(date) => period.contains(date),
                None => false,
            }
        })
        .map(|row| row.cell(roles.amount).as_amount())
        .sum();

    if total.is_finite() {
        WriteOffSummary {
            total,
            schema_resolved: true,
        }
    } else {
        WriteOffSummary::zero(true)
    }
}
