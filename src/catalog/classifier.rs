//! Category assignment from ordered keyword rules.

use super::record::{CategoryAssignment, WorkflowRecord, UNCATEGORIZED};
use super::rules::{default_category_rules, CategoryRule};

/// Assigns each record exactly one category.
///
/// Rules are checked in declaration order and the first rule with a
/// keyword contained in any of the record's integrations wins, even when
/// a later rule would match more of them.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
}

impl Classifier {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
                name: rule.name,
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category label for one record.
    pub fn classify(&self, record: &WorkflowRecord) -> &str {
        let integrations: Vec<String> = record
            .integrations
            .iter()
            .map(|i| i.to_lowercase())
            .collect();

        self.rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|kw| integrations.iter().any(|i| i.contains(kw.as_str())))
            })
            .map(|rule| rule.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Classify every record.
    pub fn assign(&self, records: &[WorkflowRecord]) -> CategoryAssignment {
        let mut mapping = CategoryAssignment::new();
        for record in records {
            mapping.insert(record.filename.clone(), self.classify(record));
        }
        mapping
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_category_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::test_record as record;

    #[test]
    fn test_first_declared_rule_wins() {
        let classifier = Classifier::default();
        let r = record("a.json", &["slack", "hubspot"]);
        assert_eq!(classifier.classify(&r), "Communication");

        let reversed = record("b.json", &["hubspot", "slack"]);
        assert_eq!(classifier.classify(&reversed), "Communication");
    }

    #[test]
    fn test_rule_order_decides() {
        let classifier = Classifier::new(vec![
            CategoryRule::new("CRM & Sales", &["hubspot"]),
            CategoryRule::new("Communication", &["slack"]),
        ]);
        let r = record("a.json", &["slack", "hubspot"]);
        assert_eq!(classifier.classify(&r), "CRM & Sales");
    }

    #[test]
    fn test_substring_and_case_insensitive() {
        let classifier = Classifier::new(vec![CategoryRule {
            name: "Data".to_string(),
            keywords: vec!["Sheets".to_string()],
        }]);
        assert_eq!(classifier.classify(&record("a.json", &["googleSheets"])), "Data");
    }

    #[test]
    fn test_uncategorized() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(&record("a.json", &[])), UNCATEGORIZED);
        assert_eq!(classifier.classify(&record("b.json", &["zzz"])), UNCATEGORIZED);
        let empty = Classifier::new(Vec::new());
        assert_eq!(empty.classify(&record("c.json", &["slack"])), UNCATEGORIZED);
    }

    #[test]
    fn test_assign_covers_every_record() {
        let classifier = Classifier::default();
        let records = vec![
            record("1.json", &["telegram"]),
            record("2.json", &["stripe"]),
            record("3.json", &[]),
        ];
        let mapping = classifier.assign(&records);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.category_of("1.json"), "Communication");
        assert_eq!(mapping.category_of("2.json"), "E-commerce & Payments");
        assert_eq!(mapping.category_of("3.json"), UNCATEGORIZED);
        assert_eq!(
            mapping.labels(),
            vec!["Communication", "E-commerce & Payments", UNCATEGORIZED]
        );
    }

    #[test]
    fn test_assign_is_deterministic() {
        let classifier = Classifier::default();
        let records = vec![
            record("1.json", &["github", "slack"]),
            record("2.json", &["notion"]),
        ];
        assert_eq!(classifier.assign(&records), classifier.assign(&records));
    }
}
