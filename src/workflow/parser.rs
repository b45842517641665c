//! Workflow JSON parser.

use std::path::Path;

use super::types::WorkflowDocument;
use crate::error::{Error, Result};

/// Parse a workflow from raw file bytes.
///
/// The document must be a JSON object; arrays, scalars and empty input
/// are rejected. Fields of the wrong type inside an object are treated as
/// missing.
pub fn parse_workflow(bytes: &[u8]) -> Result<WorkflowDocument> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(Error::Parse("Empty workflow definition".to_string()));
    }

    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| Error::Parse(format!("Invalid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(Error::Parse(
            "Workflow definition must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| Error::Parse(format!("Invalid workflow: {}", e)))
}

/// Parse a workflow from a file path.
pub fn parse_workflow_file(path: &Path) -> Result<WorkflowDocument> {
    let content = std::fs::read(path)?;
    parse_workflow(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_workflow() {
        let json = br#"{
            "id": "wf-1",
            "name": "Webhook to Slack",
            "active": true,
            "nodes": [
                { "name": "Webhook", "type": "n8n-nodes-base.webhook", "parameters": {} },
                { "name": "Slack", "type": "n8n-nodes-base.slack" }
            ],
            "connections": {
                "Webhook": { "main": [[{ "node": "Slack", "type": "main", "index": 0 }]] }
            }
        }"#;

        let workflow = parse_workflow(json).unwrap();
        assert_eq!(workflow.name.as_deref(), Some("Webhook to Slack"));
        assert!(workflow.active);
        assert_eq!(workflow.nodes.len(), 2);
        assert_eq!(workflow.connections.edge_count(), 1);
    }

    #[test]
    fn test_parse_minimal_object() {
        let workflow = parse_workflow(b"{}").unwrap();
        assert!(workflow.name.is_none());
        assert!(!workflow.active);
        assert!(workflow.nodes.is_empty());
        assert!(workflow.connections.is_empty());
    }

    #[test]
    fn test_parse_empty_workflow() {
        let result = parse_workflow(b"  \n");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .to_lowercase()
            .contains("empty workflow"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_workflow(b"{ \"name\": ");
        assert!(result.unwrap_err().to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_parse_non_object() {
        let result = parse_workflow(b"[1, 2, 3]");
        assert!(result.unwrap_err().to_string().contains("JSON object"));
    }

    #[test]
    fn test_parse_tolerates_mistyped_fields() {
        let workflow = parse_workflow(
            br#"{
                "name": ["not", "a", "string"],
                "active": null,
                "tags": null,
                "createdAt": 1700000000,
                "nodes": [{ "type": 5 }, { "name": "Hook", "type": "n8n-nodes-base.webhook" }]
            }"#,
        )
        .unwrap();
        assert!(workflow.name.is_none());
        assert!(!workflow.active);
        assert!(workflow.tags.is_empty());
        assert!(workflow.created_at.is_none());
        assert_eq!(workflow.nodes.len(), 2);
        assert!(workflow.nodes[0].node_type.is_none());

        let list_as_string = parse_workflow(br#"{ "nodes": "not a list" }"#).unwrap();
        assert!(list_as_string.nodes.is_empty());
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_workflow_file(Path::new("/nonexistent/flowdex/wf.json")).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
