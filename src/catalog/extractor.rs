//! Workflow file → catalog record.

use std::path::Path;

use tracing::debug;

use super::naming::derive_name;
use super::record::{TriggerType, WorkflowRecord};
use super::rules::AnalysisRules;
use crate::error::{Error, Result};
use crate::workflow::{parse_workflow, WorkflowNode};

/// Description used when nothing else can be said about a workflow.
pub const FALLBACK_DESCRIPTION: &str = "Workflow automation";

const DESCRIPTION_SEPARATOR: &str = " • ";
const DESCRIPTION_INTEGRATIONS: usize = 3;

/// Result of the single pass over a workflow's nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAnalysis {
    pub trigger_type: TriggerType,
    pub integrations: Vec<String>,
}

/// Builds [`WorkflowRecord`]s from workflow files.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    rules: AnalysisRules,
}

impl Extractor {
    pub fn new(rules: AnalysisRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &AnalysisRules {
        &self.rules
    }

    /// Read and analyze one file.
    pub fn extract_file(&self, path: &Path) -> Result<WorkflowRecord> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Workflow(format!("Invalid file name: {}", path.display())))?;

        let bytes = std::fs::read(path)?;
        let size = std::fs::metadata(path)?.len();
        self.extract(filename, &bytes, size)
    }

    /// Analyze already-read file content.
    pub fn extract(&self, filename: &str, bytes: &[u8], file_size: u64) -> Result<WorkflowRecord> {
        let doc = parse_workflow(bytes)?;

        let name = derive_name(
            filename,
            doc.name.as_deref(),
            &self.rules.placeholder_prefixes,
            &self.rules.token_overrides,
        );
        let analysis = self.analyze_nodes(&doc.nodes);
        let node_count = doc.nodes.len();
        let complexity = self.rules.thresholds.classify(node_count);
        let description = describe(analysis.trigger_type, &analysis.integrations, node_count);

        debug!(
            file = %filename,
            trigger = %analysis.trigger_type,
            nodes = node_count,
            "Extracted workflow"
        );

        Ok(WorkflowRecord {
            filename: filename.to_string(),
            name,
            workflow_id: doc.id_string(),
            active: doc.active,
            description,
            trigger_type: analysis.trigger_type,
            complexity,
            node_count,
            integrations: analysis.integrations,
            tags: doc.tag_names(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            file_hash: fingerprint(bytes),
            file_size,
            nodes: doc.nodes,
            connections: doc.connections,
        })
    }

    /// Scan nodes once for trigger markers and integration identifiers.
    ///
    /// The trigger type is whatever the last recognized trigger node says;
    /// there is no priority between webhook, cron and HTTP nodes.
    pub fn analyze_nodes(&self, nodes: &[WorkflowNode]) -> NodeAnalysis {
        let mut analysis = NodeAnalysis::default();

        for node in nodes {
            let Some(node_type) = node.node_type.as_deref() else {
                continue;
            };

            if let Some(integration) = integration_of(node_type) {
                if !analysis.integrations.iter().any(|i| i == integration) {
                    analysis.integrations.push(integration.to_string());
                }
            }

            if let Some(trigger) = self.rules.markers.match_type(node_type) {
                analysis.trigger_type = trigger;
            }
        }

        analysis
    }
}

/// Third dot-separated segment of a type marker with more than two.
pub fn integration_of(node_type: &str) -> Option<&str> {
    let mut segments = node_type.split('.');
    let third = segments.nth(2)?;
    if third.is_empty() {
        None
    } else {
        Some(third)
    }
}

/// Compose the short summary shown on catalog cards.
pub fn describe(trigger: TriggerType, integrations: &[String], node_count: usize) -> String {
    let mut parts = Vec::new();

    if trigger != TriggerType::Manual {
        parts.push(format!("{} trigger", trigger));
    }

    if !integrations.is_empty() {
        let shown: Vec<&str> = integrations
            .iter()
            .take(DESCRIPTION_INTEGRATIONS)
            .map(String::as_str)
            .collect();
        parts.push(format!("integrates with {}", shown.join(", ")));
    }

    if node_count > 1 {
        parts.push(format!("{} nodes", node_count));
    }

    if parts.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        parts.join(DESCRIPTION_SEPARATOR)
    }
}

/// Content fingerprint for change detection.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(md5::compute(bytes).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Complexity;

    fn node(node_type: &str) -> WorkflowNode {
        WorkflowNode::new(None, Some(node_type))
    }

    fn workflow_json(types: &[&str]) -> Vec<u8> {
        let nodes: Vec<serde_json::Value> = types
            .iter()
            .enumerate()
            .map(|(i, t)| serde_json::json!({ "name": format!("n{}", i), "type": t }))
            .collect();
        serde_json::to_vec(&serde_json::json!({ "nodes": nodes })).unwrap()
    }

    #[test]
    fn test_integration_segment() {
        assert_eq!(integration_of("a.b.slack"), Some("slack"));
        assert_eq!(integration_of("a.b.slack.extra"), Some("slack"));
        assert_eq!(integration_of("n8n-nodes-base.slack"), None);
        assert_eq!(integration_of("plain"), None);
        assert_eq!(integration_of("a.b."), None);
    }

    #[test]
    fn test_integrations_distinct_first_seen() {
        let extractor = Extractor::default();
        let analysis = extractor.analyze_nodes(&[
            node("x.y.slack"),
            node("x.y.hubspot"),
            node("x.z.slack"),
            node("n8n-nodes-base.set"),
        ]);
        assert_eq!(analysis.integrations, vec!["slack", "hubspot"]);
        assert_eq!(analysis.trigger_type, TriggerType::Manual);
    }

    #[test]
    fn test_trigger_last_match_wins() {
        let extractor = Extractor::default();

        let webhook_then_cron = extractor.analyze_nodes(&[
            node("n8n-nodes-base.webhook"),
            node("n8n-nodes-base.cron"),
        ]);
        assert_eq!(webhook_then_cron.trigger_type, TriggerType::Scheduled);

        let cron_then_webhook = extractor.analyze_nodes(&[
            node("n8n-nodes-base.cron"),
            node("n8n-nodes-base.webhook"),
        ]);
        assert_eq!(cron_then_webhook.trigger_type, TriggerType::Webhook);

        let ends_with_http = extractor.analyze_nodes(&[
            node("n8n-nodes-base.webhook"),
            node("n8n-nodes-base.set"),
            node("n8n-nodes-base.httpRequest"),
            node("n8n-nodes-base.set"),
        ]);
        assert_eq!(ends_with_http.trigger_type, TriggerType::Http);
    }

    #[test]
    fn test_nodes_without_type_are_ignored() {
        let analysis = Extractor::default().analyze_nodes(&[WorkflowNode::new(Some("Note"), None)]);
        assert_eq!(analysis, NodeAnalysis::default());
    }

    #[test]
    fn test_describe_all_parts() {
        let integrations: Vec<String> = ["slack", "hubspot", "stripe", "jira"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            describe(TriggerType::Webhook, &integrations, 7),
            "Webhook trigger • integrates with slack, hubspot, stripe • 7 nodes"
        );
    }

    #[test]
    fn test_describe_omissions() {
        assert_eq!(describe(TriggerType::Manual, &[], 1), FALLBACK_DESCRIPTION);
        assert_eq!(describe(TriggerType::Manual, &[], 0), FALLBACK_DESCRIPTION);
        assert_eq!(describe(TriggerType::Manual, &[], 2), "2 nodes");
        assert_eq!(describe(TriggerType::Http, &[], 1), "HTTP trigger");
        assert_eq!(
            describe(TriggerType::Scheduled, &["gmail".to_string()], 1),
            "Scheduled trigger • integrates with gmail"
        );
    }

    #[test]
    fn test_fingerprint_is_md5_hex() {
        assert_eq!(fingerprint(b"hello world"), "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_extract_record() {
        let bytes = serde_json::to_vec(&serde_json::json!({
            "id": "abc",
            "name": "My workflow 2",
            "active": true,
            "tags": [{ "name": "ops" }],
            "nodes": [
                { "name": "Hook", "type": "n8n-nodes-base.webhook" },
                { "name": "Notify", "type": "custom.nodes.slack" }
            ],
            "connections": { "Hook": { "main": [[{ "node": "Notify" }]] } }
        }))
        .unwrap();

        let record = Extractor::default()
            .extract("0_Webhook_to_Slack_automation.json", &bytes, bytes.len() as u64)
            .unwrap();

        assert_eq!(record.filename, "0_Webhook_to_Slack_automation.json");
        assert_eq!(record.name, "Webhook To Slack Automation");
        assert_eq!(record.workflow_id.as_deref(), Some("abc"));
        assert!(record.active);
        assert_eq!(record.trigger_type, TriggerType::Webhook);
        assert_eq!(record.complexity, Complexity::Low);
        assert_eq!(record.node_count, 2);
        assert_eq!(record.integrations, vec!["slack"]);
        assert_eq!(
            record.description,
            "Webhook trigger • integrates with slack • 2 nodes"
        );
        assert_eq!(record.tags, vec!["ops"]);
        assert_eq!(record.file_hash, fingerprint(&bytes));
        assert_eq!(record.file_size, bytes.len() as u64);
        assert_eq!(record.connections.edge_count(), 1);
    }

    #[test]
    fn test_complexity_from_node_count() {
        let extractor = Extractor::default();
        let cases = [
            (5, Complexity::Low),
            (6, Complexity::Medium),
            (15, Complexity::Medium),
            (16, Complexity::High),
        ];
        for (count, expected) in cases {
            let types = vec!["n8n-nodes-base.set"; count];
            let bytes = workflow_json(&types);
            let record = extractor.extract("x.json", &bytes, 0).unwrap();
            assert_eq!(record.node_count, count);
            assert_eq!(record.complexity, expected, "node count {}", count);
        }
    }

    #[test]
    fn test_same_bytes_same_record() {
        let bytes = workflow_json(&["n8n-nodes-base.cron", "a.b.gmail"]);
        let extractor = Extractor::default();
        let first = extractor.extract("5_daily_digest.json", &bytes, 10).unwrap();
        let second = extractor.extract("5_daily_digest.json", &bytes, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_rejects_malformed() {
        let err = Extractor::default().extract("bad.json", b"{ broken", 8).unwrap_err();
        assert!(err.is_per_file());
    }

    #[test]
    fn test_extract_file_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3_http_poller.json");
        let bytes = workflow_json(&["n8n-nodes-base.httpRequest"]);
        std::fs::write(&path, &bytes).unwrap();

        let record = Extractor::default().extract_file(&path).unwrap();
        assert_eq!(record.name, "HTTP Poller");
        assert_eq!(record.trigger_type, TriggerType::Http);
        assert_eq!(record.file_size, bytes.len() as u64);
        assert_eq!(record.description, "HTTP trigger");
    }

    #[test]
    fn test_extract_keeps_objects_with_mistyped_metadata() {
        let extractor = Extractor::default();
        for doc in [
            r#"{ "active": null }"#,
            r#"{ "tags": null }"#,
            r#"{ "nodes": null }"#,
            r#"{ "createdAt": 1700000000 }"#,
            r#"{ "name": 7 }"#,
            r#"{ "nodes": [{ "type": 5 }] }"#,
        ] {
            let record = extractor.extract("1_x.json", doc.as_bytes(), 0).unwrap();
            assert_eq!(record.name, "X");
            assert!(!record.active);
            assert_eq!(record.trigger_type, TriggerType::Manual);
            assert!(record.integrations.is_empty());
        }

        let record = extractor
            .extract("1_x.json", br#"{ "nodes": [{ "type": 5 }, 1] }"#, 0)
            .unwrap();
        assert_eq!(record.node_count, 2);
        assert_eq!(record.description, "2 nodes");
    }
}
