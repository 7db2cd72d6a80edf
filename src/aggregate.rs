use crate::filter::LedgerFilter;
use crate::period::PeriodKey;
use crate::ProvisionedRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Scalar metrics for the selected period against the immediately
/// preceding calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current_total: f64,
    pub comparison_total: f64,
    pub absolute_delta: f64,
    /// 0 when the comparison period is zero-valued; never NaN or infinite.
    pub percent_delta: f64,
}

/// One point of a trailing series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub period: PeriodKey,
    pub total: f64,
}

/// Per-bucket provision sums over one period's filtered rows, for
/// distribution charts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketBreakdown {
    pub days_91_180: f64,
    pub days_181_270: f64,
    pub days_271_360: f64,
    pub over_360: f64,
}

fn period_total(rows: &[ProvisionedRow], filter: &LedgerFilter, period: PeriodKey) -> f64 {
    let scoped = filter.for_period(period);
    rows.iter()
        .filter(|r| scoped.matches(r))
        .map(|r| r.provisions.total)
        .sum()
}

/// Totals for `period` and for `period - 1 month`, with the client criteria
/// re-applied independently to each period's row-set. A comparison period
/// with no data yields a zero baseline and a percent delta of 0.
pub fn compare_periods(
    rows: &[ProvisionedRow],
    filter: &LedgerFilter,
    period: PeriodKey,
) -> PeriodComparison {
    let current_total = period_total(rows, filter, period);
    let comparison_total = period_total(rows, filter, period.prev());
    let absolute_delta = current_total - comparison_total;
    let percent_delta = if comparison_total != 0.0 {
        absolute_delta / comparison_total * 100.0
    } else {
        0.0
    };

    PeriodComparison {
        current_total,
        comparison_total,
        absolute_delta,
        percent_delta,
    }
}

/// Per-period totals for the `n` calendar months ending at `period`,
/// chronological, zero-filled. Always exactly `n` entries regardless of
/// data sparsity, so the line chart keeps a fixed width.
pub fn trailing_series(
    rows: &[ProvisionedRow],
    filter: &LedgerFilter,
    period: PeriodKey,
    n: usize,
) -> Vec<PeriodTotal> {
    period
        .trailing(n)
        .into_iter()
        .map(|p| PeriodTotal {
            period: p,
            total: period_total(rows, filter, p),
        })
        .collect()
}

/// Sums each of the four bucket-provision columns over the period's
/// filtered rows.
pub fn bucket_breakdown(
    rows: &[ProvisionedRow],
    filter: &LedgerFilter,
    period: PeriodKey,
) -> BucketBreakdown {
    let scoped = filter.for_period(period);
    let mut breakdown = BucketBreakdown::default();
    for row in rows.iter().filter(|r| scoped.matches(r)) {
        breakdown.days_91_180 += row.provisions.days_91_180;
        breakdown.days_181_270 += row.provisions.days_181_270;
        breakdown.days_271_360 += row.provisions.days_271_360;
        breakdown.over_360 += row.provisions.over_360;
    }
    breakdown
}

/// Distinct periods present in the ledger, calendar order. Feeds the
/// dashboard's period selector.
pub fn available_periods(rows: &[ProvisionedRow]) -> Vec<PeriodKey> {
    let set: BTreeSet<PeriodKey> = rows
        .iter()
        .map(|r| PeriodKey::from_date(r.source.as_of_date))
        .collect();
    set.into_iter().collect()
}

/// Distinct customer names, sorted. Internal clients never reach the
/// provisioned row-set, so they never appear here.
pub fn client_names(rows: &[ProvisionedRow]) -> Vec<String> {
    let set: BTreeSet<String> = rows
        .iter()
        .map(|r| r.source.customer_name.clone())
        .collect();
    set.into_iter().collect()
}
