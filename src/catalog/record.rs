//! Catalog record types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::workflow::{ConnectionMap, WorkflowNode};

/// Category label used when no rule matches.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Coarse size bucket derived from node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Complexity::Low),
            "medium" => Ok(Complexity::Medium),
            "high" => Ok(Complexity::High),
            other => Err(Error::Parse(format!("Unknown complexity: {}", other))),
        }
    }
}

/// What starts a workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerType {
    #[default]
    Manual,
    Webhook,
    Scheduled,
    #[serde(rename = "HTTP")]
    Http,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::Manual => "Manual",
            TriggerType::Webhook => "Webhook",
            TriggerType::Scheduled => "Scheduled",
            TriggerType::Http => "HTTP",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manual" => Ok(TriggerType::Manual),
            "Webhook" => Ok(TriggerType::Webhook),
            "Scheduled" => Ok(TriggerType::Scheduled),
            "HTTP" => Ok(TriggerType::Http),
            other => Err(Error::Parse(format!("Unknown trigger type: {}", other))),
        }
    }
}

/// Derived metadata for one workflow file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    /// Source file name; unique key shared with category assignments
    pub filename: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,

    #[serde(default)]
    pub active: bool,

    pub description: String,

    pub trigger_type: TriggerType,

    pub complexity: Complexity,

    pub node_count: usize,

    /// Distinct identifiers in first-seen order
    #[serde(default)]
    pub integrations: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Hex MD5 of the raw file bytes
    pub file_hash: String,

    pub file_size: u64,

    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,

    #[serde(default)]
    pub connections: ConnectionMap,
}

impl WorkflowRecord {
    /// Case-insensitive substring match on name, description and
    /// integrations. `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .integrations
                .iter()
                .any(|i| i.to_lowercase().contains(needle))
    }
}

/// filename → category label.
///
/// Ordered by filename so the emitted JSON is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryAssignment(BTreeMap<String, String>);

impl CategoryAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filename: impl Into<String>, category: impl Into<String>) {
        self.0.insert(filename.into(), category.into());
    }

    /// Assigned category, or `"Uncategorized"` when the file has none.
    pub fn category_of(&self, filename: &str) -> &str {
        self.0
            .get(filename)
            .map(String::as_str)
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.0.get(filename).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted distinct labels.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.0.values().cloned().collect();
        labels.sort();
        labels.dedup();
        labels
    }
}

#[cfg(test)]
pub(crate) fn test_record(filename: &str, integrations: &[&str]) -> WorkflowRecord {
    WorkflowRecord {
        filename: filename.to_string(),
        name: filename.to_string(),
        workflow_id: None,
        active: false,
        description: String::new(),
        trigger_type: TriggerType::Manual,
        complexity: Complexity::Low,
        node_count: 0,
        integrations: integrations.iter().map(|s| s.to_string()).collect(),
        tags: Vec::new(),
        created_at: None,
        updated_at: None,
        file_hash: String::new(),
        file_size: 0,
        nodes: Vec::new(),
        connections: ConnectionMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(TriggerType::Http).unwrap(), "HTTP");
        assert_eq!(serde_json::to_value(TriggerType::Scheduled).unwrap(), "Scheduled");
        assert_eq!(serde_json::to_value(Complexity::Medium).unwrap(), "medium");
        assert_eq!("HTTP".parse::<TriggerType>().unwrap(), TriggerType::Http);
        assert!("http".parse::<TriggerType>().is_err());
        assert_eq!("high".parse::<Complexity>().unwrap(), Complexity::High);
    }

    #[test]
    fn test_category_default() {
        let mut mapping = CategoryAssignment::new();
        mapping.insert("a.json", "Communication");
        assert_eq!(mapping.category_of("a.json"), "Communication");
        assert_eq!(mapping.category_of("missing.json"), UNCATEGORIZED);
        assert_eq!(mapping.get("missing.json"), None);
    }

    #[test]
    fn test_labels_sorted_distinct() {
        let mut mapping = CategoryAssignment::new();
        mapping.insert("c.json", UNCATEGORIZED);
        mapping.insert("a.json", "Communication");
        mapping.insert("b.json", "Communication");
        mapping.insert("d.json", "CRM & Sales");
        assert_eq!(
            mapping.labels(),
            vec!["CRM & Sales", "Communication", UNCATEGORIZED]
        );
    }

    #[test]
    fn test_assignment_serializes_as_plain_object() {
        let mut mapping = CategoryAssignment::new();
        mapping.insert("b.json", "Communication");
        mapping.insert("a.json", UNCATEGORIZED);
        assert_eq!(
            serde_json::to_string(&mapping).unwrap(),
            r#"{"a.json":"Uncategorized","b.json":"Communication"}"#
        );
    }
}
