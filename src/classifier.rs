use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// INTERNAL clients are house accounts: they are excluded from provisioning
/// and from every reported aggregate, upstream of rule application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ClientType {
    Internal,
    Regular,
}

/// Identifier prefixes that mark a house account. Matched case-sensitively
/// against the raw identifier.
const INTERNAL_PREFIXES: &[&str] = &["INT", "SH"];

/// Known internal codes that carry no telltale prefix. This set is
/// configuration, fixed per deployment, never derived from the data.
const DEFAULT_INTERNAL_CODES: &[&str] = &["INTERCO", "999998", "999999"];

#[derive(Debug, Clone)]
pub struct ClientClassifier {
    denylist: BTreeSet<String>,
}

impl Default for ClientClassifier {
    fn default() -> Self {
        Self::with_denylist(DEFAULT_INTERNAL_CODES.iter().map(|c| c.to_string()))
    }
}

impl ClientClassifier {
    pub fn with_denylist(codes: impl IntoIterator<Item = String>) -> Self {
        Self {
            denylist: codes.into_iter().collect(),
        }
    }

    /// Classifies a customer identifier. An empty identifier matches no
    /// prefix and no denylist entry and so classifies as REGULAR; source
    /// variants disagree on whether that is intentional, see DESIGN.md.
    pub fn classify(&self, customer_id: &str) -> ClientType {
        if INTERNAL_PREFIXES
            .iter()
            .any(|prefix| customer_id.starts_with(prefix))
        {
            return ClientType::Internal;
        }
        if self.denylist.contains(customer_id) {
            return ClientType::Internal;
        }
        ClientType::Regular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching_is_case_sensitive() {
        let classifier = ClientClassifier::default();
        assert_eq!(classifier.classify("INT001"), ClientType::Internal);
        assert_eq!(classifier.classify("SH-HOUSE"), ClientType::Internal);
        assert_eq!(classifier.classify("int001"), ClientType::Regular);
        assert_eq!(classifier.classify("sh-house"), ClientType::Regular);
    }

    #[test]
    fn test_denylist_exact_match() {
        let classifier = ClientClassifier::default();
        assert_eq!(classifier.classify("999999"), ClientType::Internal);
        assert_eq!(classifier.classify("9999990"), ClientType::Regular);

        let custom = ClientClassifier::with_denylist(vec!["HQ-USA".to_string()]);
        assert_eq!(custom.classify("HQ-USA"), ClientType::Internal);
        assert_eq!(custom.classify("999999"), ClientType::Regular);
    }

    #[test]
    fn test_regular_clients() {
        let classifier = ClientClassifier::default();
        assert_eq!(classifier.classify("NAC001"), ClientType::Regular);
        assert_eq!(classifier.classify("ACME-42"), ClientType::Regular);
    }

    #[test]
    fn test_empty_identifier_defaults_to_regular() {
        let classifier = ClientClassifier::default();
        assert_eq!(classifier.classify(""), ClientType::Regular);
    }
}
