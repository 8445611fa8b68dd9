//! Candidate payload generation
//!
//! Turns a logical patch (logical field name to new value) into the ordered
//! list of concrete payload shapes to attempt against the store, one per
//! configured column scheme. Schemes are always tried from the top; the
//! generator never memoizes which scheme last worked, because a different
//! logical field on the same entity kind may resolve to a different scheme.

use crate::core::Payload;
use crate::schema::config::ColumnScheme;

#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    schemes: Vec<ColumnScheme>,
}

impl CandidateGenerator {
    pub fn new(schemes: Vec<ColumnScheme>) -> Self {
        Self { schemes }
    }

    /// Produce one candidate payload per scheme, in scheme order.
    ///
    /// Logical fields a scheme does not map pass through under their logical
    /// name. Mirror columns receive the same value as their primary column.
    /// Identical payloads produced by different schemes are emitted once, at
    /// their first position. An empty patch yields no candidates.
    pub fn candidates(&self, patch: &Payload) -> Vec<Payload> {
        if patch.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<Payload> = Vec::new();
        for scheme in &self.schemes {
            let mut payload = Payload::new();
            for (logical, value) in patch {
                match scheme.mapping(logical) {
                    Some(mapping) => {
                        payload.insert(mapping.column.clone(), value.clone());
                        for mirror in &mapping.mirrors {
                            payload.insert(mirror.clone(), value.clone());
                        }
                    }
                    None => {
                        payload.insert(logical.clone(), value.clone());
                    }
                }
            }
            if !out.contains(&payload) {
                out.push(payload);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(entries: &[(&str, serde_json::Value)]) -> Payload {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn generator() -> CandidateGenerator {
        CandidateGenerator::new(vec![
            ColumnScheme::new("canonical")
                .map("name", "company_name")
                .map("active", "is_active"),
            ColumnScheme::new("generic").map("name", "name").map("active", "active"),
        ])
    }

    #[test]
    fn test_scheme_order_preserved() {
        let candidates = generator().candidates(&patch(&[("name", json!("Acme"))]));

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].get("company_name"), Some(&json!("Acme")));
        assert_eq!(candidates[1].get("name"), Some(&json!("Acme")));
    }

    #[test]
    fn test_unmapped_field_passes_through() {
        let candidates = generator().candidates(&patch(&[("region_code", json!("NE"))]));

        // Both schemes fall through to the logical name, so the payloads
        // collapse into a single candidate.
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].get("region_code"), Some(&json!("NE")));
    }

    #[test]
    fn test_mirror_columns_carry_same_value() {
        let generator = CandidateGenerator::new(vec![ColumnScheme::new("mixed")
            .map_with_mirrors("active", "is_active", &["active_flag"])]);

        let candidates = generator.candidates(&patch(&[("active", json!(true))]));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].get("is_active"), Some(&json!(true)));
        assert_eq!(candidates[0].get("active_flag"), Some(&json!(true)));
    }

    #[test]
    fn test_multi_field_patch_stays_in_one_payload() {
        let candidates =
            generator().candidates(&patch(&[("name", json!("Acme")), ("active", json!(false))]));

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].len(), 2);
        assert_eq!(candidates[0].get("company_name"), Some(&json!("Acme")));
        assert_eq!(candidates[0].get("is_active"), Some(&json!(false)));
    }

    #[test]
    fn test_empty_patch_yields_no_candidates() {
        assert!(generator().candidates(&Payload::new()).is_empty());
    }
}
