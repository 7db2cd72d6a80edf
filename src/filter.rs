use crate::period::PeriodKey;
use crate::ProvisionedRow;

/// Sentinel for the presentation layer's "All" entry in the client
/// selector; an exact-client filter set to it is a no-op.
pub const ALL_CLIENTS: &str = "All";

/// Filter criteria threaded explicitly through every query. There is no
/// ambient filter state in the engine; the presentation layer owns its
/// widget state and passes a fresh filter per recomputation.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    period: Option<PeriodKey>,
    search: Option<String>,
    exact_client: Option<String>,
}

impl LedgerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: PeriodKey) -> Self {
        self.period = Some(period);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn exact_client(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.eq_ignore_ascii_case(ALL_CLIENTS) {
            self.exact_client = None;
        } else {
            self.exact_client = Some(name);
        }
        self
    }

    /// Same client criteria pointed at a different period. The aggregator
    /// uses this to re-apply filters to the comparison period rather than
    /// freezing the current period's row-set.
    pub fn for_period(&self, period: PeriodKey) -> Self {
        let mut shifted = self.clone();
        shifted.period = Some(period);
        shifted
    }

    pub fn selected_period(&self) -> Option<PeriodKey> {
        self.period
    }

    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn exact_client_name(&self) -> Option<&str> {
        self.exact_client.as_deref()
    }

    /// Main-ledger semantics: period AND search AND exact-client all narrow
    /// the set. Search matches customer name OR identifier, case-insensitive
    /// substring. (The write-off reconciler instead gives exact-client
    /// precedence over search; see `writeoff`.)
    pub fn matches(&self, row: &ProvisionedRow) -> bool {
        if let Some(period) = self.period {
            if !period.contains(row.source.as_of_date) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let name_hit = row.source.customer_name.to_lowercase().contains(&needle);
            let id_hit = row.source.customer_id.to_lowercase().contains(&needle);
            if !name_hit && !id_hit {
                return false;
            }
        }
        if let Some(client) = &self.exact_client {
            if row.source.customer_name != *client {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, rows: &[ProvisionedRow]) -> Vec<ProvisionedRow> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClientType;
    use crate::policy::provision;
    use crate::schema::LedgerRow;
    use chrono::NaiveDate;

    fn provisioned(name: &str, id: &str, year: i32, month: u32) -> ProvisionedRow {
        let source = LedgerRow {
            as_of_date: NaiveDate::from_ymd_opt(year, month, 15).unwrap(),
            customer_id: id.to_string(),
            customer_name: name.to_string(),
            current: None,
            bucket_1_90: None,
            bucket_91_180: Some(100.0),
            bucket_181_270: None,
            bucket_271_360: None,
            bucket_over_360: None,
            total_balance: Some(100.0),
        };
        let provisions = provision(&source);
        ProvisionedRow {
            source,
            client_type: ClientType::Regular,
            provisions,
        }
    }

    #[test]
    fn test_period_filter_is_exact_year_and_month() {
        let rows = vec![
            provisioned("ACME", "NAC001", 2024, 3),
            provisioned("ACME", "NAC001", 2024, 4),
            provisioned("ACME", "NAC001", 2025, 3),
        ];
        let filter = LedgerFilter::new().period(PeriodKey::new(2024, 3));
        assert_eq!(filter.apply(&rows).len(), 1);
    }

    #[test]
    fn test_search_matches_name_or_id() {
        let rows = vec![
            provisioned("ACME Corp", "NAC001", 2024, 3),
            provisioned("Globex", "NAC002", 2024, 3),
        ];
        let by_name = LedgerFilter::new().search("acme");
        assert_eq!(by_name.apply(&rows).len(), 1);

        let by_id = LedgerFilter::new().search("nac");
        assert_eq!(by_id.apply(&rows).len(), 2);
    }

    #[test]
    fn test_exact_client_and_search_are_conjunctive() {
        let rows = vec![
            provisioned("ACME Corp", "NAC001", 2024, 3),
            provisioned("ACME Ltd", "NAC003", 2024, 3),
        ];
        let filter = LedgerFilter::new()
            .search("acme")
            .exact_client("ACME Ltd");
        let hits = filter.apply(&rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source.customer_name, "ACME Ltd");

        // Search that misses the exact client empties the result.
        let filter = LedgerFilter::new()
            .search("corp")
            .exact_client("ACME Ltd");
        assert!(filter.apply(&rows).is_empty());
    }

    #[test]
    fn test_all_sentinel_is_a_no_op() {
        let rows = vec![
            provisioned("ACME Corp", "NAC001", 2024, 3),
            provisioned("Globex", "NAC002", 2024, 3),
        ];
        let filter = LedgerFilter::new().exact_client("All");
        assert_eq!(filter.apply(&rows).len(), 2);
        assert!(filter.exact_client_name().is_none());
    }

    #[test]
    fn test_for_period_keeps_client_criteria() {
        let filter = LedgerFilter::new()
            .period(PeriodKey::new(2024, 3))
            .search("acme");
        let shifted = filter.for_period(PeriodKey::new(2024, 2));
        assert_eq!(shifted.selected_period(), Some(PeriodKey::new(2024, 2)));
        assert_eq!(shifted.search_text(), Some("acme"));
    }
}
