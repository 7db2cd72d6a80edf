use crate::schema::LedgerRow;
use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The four provisionable aging buckets. Balances overdue by 90 days or
/// less carry no provision under the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum AgingBucket {
    Days91To180,
    Days181To270,
    Days271To360,
    Over360,
}

pub const PROVISIONABLE_BUCKETS: [AgingBucket; 4] = [
    AgingBucket::Days91To180,
    AgingBucket::Days181To270,
    AgingBucket::Days271To360,
    AgingBucket::Over360,
];

impl AgingBucket {
    /// The policy rate table, keyed by bucket and fiscal year. Years before
    /// 2025 take the 2024 column, 2025 and later the 2025 column; rows
    /// outside 2024-2025 are excluded upstream by the period filter.
    ///
    /// The 91-180 rate drops from 20% to 3% in 2025 while 271-360 escalates
    /// to a full write-down. The step is policy, not a typo.
    pub fn rate(self, year: i32) -> f64 {
        match (self, year) {
            (AgingBucket::Days91To180, y) if y <= 2024 => 0.20,
            (AgingBucket::Days91To180, _) => 0.03,
            (AgingBucket::Days181To270, _) => 0.50,
            (AgingBucket::Days271To360, y) if y <= 2024 => 0.50,
            (AgingBucket::Days271To360, _) => 1.00,
            (AgingBucket::Over360, _) => 1.00,
        }
    }
}

/// Per-bucket provision amounts for one ledger row. `total` is always the
/// exact sum of the four components, and every component is >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BucketProvisions {
    pub days_91_180: f64,
    pub days_181_270: f64,
    pub days_271_360: f64,
    pub over_360: f64,
    pub total: f64,
}

/// A missing, non-finite, or non-positive balance contributes exactly 0,
/// never a negative provision and never an error.
fn provisionable(balance: Option<f64>) -> f64 {
    match balance {
        Some(b) if b.is_finite() && b > 0.0 => b,
        _ => 0.0,
    }
}

/// Computes the row's provisions: a pure function of the bucket balances
/// and the `as_of_date` year component.
pub fn provision(row: &LedgerRow) -> BucketProvisions {
    let year = row.as_of_date.year();

    let days_91_180 = provisionable(row.bucket_91_180) * AgingBucket::Days91To180.rate(year);
    let days_181_270 = provisionable(row.bucket_181_270) * AgingBucket::Days181To270.rate(year);
    let days_271_360 = provisionable(row.bucket_271_360) * AgingBucket::Days271To360.rate(year);
    let over_360 = provisionable(row.bucket_over_360) * AgingBucket::Over360.rate(year);

    BucketProvisions {
        days_91_180,
        days_181_270,
        days_271_360,
        over_360,
        total: days_91_180 + days_181_270 + days_271_360 + over_360,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(year: i32, b91: Option<f64>, b181: Option<f64>, b271: Option<f64>, b360: Option<f64>) -> LedgerRow {
        LedgerRow {
            as_of_date: NaiveDate::from_ymd_opt(year, 6, 30).unwrap(),
            customer_id: "NAC001".to_string(),
            customer_name: "ACME".to_string(),
            current: None,
            bucket_1_90: None,
            bucket_91_180: b91,
            bucket_181_270: b181,
            bucket_271_360: b271,
            bucket_over_360: b360,
            total_balance: None,
        }
    }

    #[test]
    fn test_91_180_rate_steps_down_in_2025() {
        let p2024 = provision(&row(2024, Some(1000.0), None, None, None));
        assert_eq!(p2024.days_91_180, 200.0);

        let p2025 = provision(&row(2025, Some(1000.0), None, None, None));
        assert_eq!(p2025.days_91_180, 30.0);
    }

    #[test]
    fn test_181_270_rate_is_flat_across_years() {
        let p2024 = provision(&row(2024, None, Some(1000.0), None, None));
        let p2025 = provision(&row(2025, None, Some(1000.0), None, None));
        assert_eq!(p2024.days_181_270, 500.0);
        assert_eq!(p2025.days_181_270, 500.0);
    }

    #[test]
    fn test_271_360_escalates_to_full_write_down() {
        let p2024 = provision(&row(2024, None, None, Some(1000.0), None));
        assert_eq!(p2024.days_271_360, 500.0);

        let p2025 = provision(&row(2025, None, None, Some(1000.0), None));
        assert_eq!(p2025.days_271_360, 1000.0);
    }

    #[test]
    fn test_over_360_is_identity_pass_through() {
        let p = provision(&row(2024, None, None, None, Some(500.0)));
        assert_eq!(p.over_360, 500.0);
        assert_eq!(p.total, 500.0);
    }

    #[test]
    fn test_nonpositive_and_missing_balances_provision_zero() {
        let p = provision(&row(2024, Some(-250.0), Some(0.0), None, Some(f64::NAN)));
        assert_eq!(p.days_91_180, 0.0);
        assert_eq!(p.days_181_270, 0.0);
        assert_eq!(p.days_271_360, 0.0);
        assert_eq!(p.over_360, 0.0);
        assert_eq!(p.total, 0.0);
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let p = provision(&row(
            2024,
            Some(1000.0),
            Some(400.0),
            Some(200.0),
            Some(100.0),
        ));
        assert_eq!(
            p.total,
            p.days_91_180 + p.days_181_270 + p.days_271_360 + p.over_360
        );
        assert_eq!(p.total, 200.0 + 200.0 + 100.0 + 100.0);
    }

    #[test]
    fn test_provision_is_idempotent() {
        let r = row(2025, Some(777.0), Some(88.0), None, Some(9.0));
        assert_eq!(provision(&r), provision(&r));
    }
}
