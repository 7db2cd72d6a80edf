//! # Provision Engine
//!
//! A library for computing accounts-receivable loss provisions from an
//! aging-bucket ledger, with month-over-month comparison and write-off
//! reconciliation. The surrounding dashboard (filter widgets, charts, file
//! loading) is an external collaborator: it hands the engine an
//! already-parsed ledger snapshot plus the active filter criteria, and
//! renders what comes back.
//!
//! ## Core Concepts
//!
//! - **Aging bucket**: a balance classified by how many days it is overdue
//!   (91-180, 181-270, 271-360, >360)
//! - **Provision**: the estimated uncollectible portion of a bucket balance,
//!   `balance x policy rate`, where the rate depends on bucket and fiscal year
//! - **Period**: a (year, month) calendar bucket; the comparison period is
//!   always exactly one month before the selected one
//! - **Client type**: INTERNAL house accounts are excluded from every
//!   aggregate, upstream of rule application
//!
//! ## Example
//!
//! ```rust,ignore
//! use provision_engine::*;
//! use chrono::NaiveDate;
//!
//! let ledger = vec![LedgerRow {
//!     as_of_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//!     customer_id: "NAC001".to_string(),
//!     customer_name: "ACME".to_string(),
//!     current: Some(1_000.0),
//!     bucket_1_90: None,
//!     bucket_91_180: Some(500.0),
//!     bucket_181_270: None,
//!     bucket_271_360: None,
//!     bucket_over_360: None,
//!     total_balance: Some(1_500.0),
//! }];
//!
//! let query = ReportQuery::new(PeriodKey::new(2024, 3));
//! let report = build_report(&ledger, None, &query);
//! assert_eq!(report.comparison.current_total, 100.0);
//! ```

pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod filter;
pub mod period;
pub mod policy;
pub mod schema;
pub mod writeoff;

pub use aggregate::{
    available_periods, bucket_breakdown, client_names, compare_periods, trailing_series,
    BucketBreakdown, PeriodComparison, PeriodTotal,
};
pub use classifier::{ClientClassifier, ClientType};
pub use error::{ProvisionError, Result};
pub use filter::{LedgerFilter, ALL_CLIENTS};
pub use period::PeriodKey;
pub use policy::{provision, AgingBucket, BucketProvisions, PROVISIONABLE_BUCKETS};
pub use schema::{Cell, LedgerRow, WriteOffRecord, WriteOffSheet};
pub use writeoff::{reconcile, resolve_columns, ColumnRoles, SchemaResolution, WriteOffSummary};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Width of the evolution series surfaced to the line chart.
pub const TRAILING_PERIODS: usize = 5;

/// A ledger row after classification and rule application. Immutable once
/// derived; the engine re-derives on every load rather than caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedRow {
    pub source: LedgerRow,
    pub client_type: ClientType,
    pub provisions: BucketProvisions,
}

/// Classifies every row, drops INTERNAL clients, and derives provisions for
/// the rest. Exclusion happens here, once, so internal balances never reach
/// totals, tables, or charts downstream.
pub fn provision_ledger(
    ledger: &[LedgerRow],
    classifier: &ClientClassifier,
) -> Vec<ProvisionedRow> {
    let mut excluded = 0usize;
    let provisioned: Vec<ProvisionedRow> = ledger
        .iter()
        .filter_map(|row| {
            let client_type = classifier.classify(&row.customer_id);
            if client_type == ClientType::Internal {
                excluded += 1;
                return None;
            }
            Some(ProvisionedRow {
                source: row.clone(),
                client_type,
                provisions: provision(row),
            })
        })
        .collect();

    if excluded > 0 {
        debug!("excluded {} internal-client rows from provisioning", excluded);
    }
    provisioned
}

/// The presentation layer's active filter state, threaded explicitly per
/// recomputation. Repeated invocation with identical inputs yields
/// identical outputs.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub period: PeriodKey,
    pub search: Option<String>,
    pub exact_client: Option<String>,
}

impl ReportQuery {
    pub fn new(period: PeriodKey) -> Self {
        Self {
            period,
            search: None,
            exact_client: None,
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn exact_client(mut self, name: impl Into<String>) -> Self {
        self.exact_client = Some(name.into());
        self
    }

    fn to_filter(&self) -> LedgerFilter {
        let mut filter = LedgerFilter::new().period(self.period);
        if let Some(search) = &self.search {
            filter = filter.search(search.clone());
        }
        if let Some(client) = &self.exact_client {
            filter = filter.exact_client(client.clone());
        }
        filter
    }
}

/// Everything the dashboard renders for one query: the filtered table,
/// scalar metrics, the evolution series, distribution breakdowns for both
/// periods, and the reconciled write-off total.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub period: PeriodKey,
    pub table: Vec<ProvisionedRow>,
    pub comparison: PeriodComparison,
    pub trailing: Vec<PeriodTotal>,
    pub current_breakdown: BucketBreakdown,
    pub comparison_breakdown: BucketBreakdown,
    pub write_offs: WriteOffSummary,
}

pub struct ReportEngine {
    classifier: ClientClassifier,
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self {
            classifier: ClientClassifier::default(),
        }
    }
}

impl ReportEngine {
    pub fn new(classifier: ClientClassifier) -> Self {
        Self { classifier }
    }

    /// One full recomputation pass: classify, provision, filter, aggregate,
    /// reconcile. Pure with respect to its inputs; no fatal error paths.
    pub fn build(
        &self,
        ledger: &[LedgerRow],
        write_offs: Option<&WriteOffSheet>,
        query: &ReportQuery,
    ) -> ProvisionReport {
        info!(
            "building provision report for {} over {} ledger rows",
            query.period,
            ledger.len()
        );

        let provisioned = provision_ledger(ledger, &self.classifier);
        let filter = query.to_filter();

        let table = filter.apply(&provisioned);
        let comparison = compare_periods(&provisioned, &filter, query.period);
        let trailing = trailing_series(&provisioned, &filter, query.period, TRAILING_PERIODS);
        let current_breakdown = bucket_breakdown(&provisioned, &filter, query.period);
        let comparison_breakdown = bucket_breakdown(&provisioned, &filter, query.period.prev());
        let write_offs = reconcile(write_offs, query.period, &filter);

        if !write_offs.schema_resolved {
            debug!("write-off schema unresolved; reporting zero write-offs");
        }

        ProvisionReport {
            period: query.period,
            table,
            comparison,
            trailing,
            current_breakdown,
            comparison_breakdown,
            write_offs,
        }
    }
}

/// Convenience entry point using the default client classifier.
pub fn build_report(
    ledger: &[LedgerRow],
    write_offs: Option<&WriteOffSheet>,
    query: &ReportQuery,
) -> ProvisionReport {
    ReportEngine::default().build(ledger, write_offs, query)
}
