//! Static rule tables used by the extractor and classifier.
//!
//! Everything here is plain data. The defaults match the n8n node
//! catalog; configuration can replace any of it.

use serde::{Deserialize, Serialize};

use super::record::{Complexity, TriggerType};
use crate::error::{Error, Result};

/// Node-count bucket boundaries (both inclusive upper bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityThresholds {
    #[serde(default = "default_low_max")]
    pub low_max_nodes: usize,
    #[serde(default = "default_medium_max")]
    pub medium_max_nodes: usize,
}

impl ComplexityThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.low_max_nodes >= self.medium_max_nodes {
            return Err(Error::Config(format!(
                "low_max_nodes ({}) must be less than medium_max_nodes ({})",
                self.low_max_nodes, self.medium_max_nodes
            )));
        }
        Ok(())
    }

    pub fn classify(&self, node_count: usize) -> Complexity {
        if node_count <= self.low_max_nodes {
            Complexity::Low
        } else if node_count <= self.medium_max_nodes {
            Complexity::Medium
        } else {
            Complexity::High
        }
    }
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            low_max_nodes: default_low_max(),
            medium_max_nodes: default_medium_max(),
        }
    }
}

fn default_low_max() -> usize {
    5
}

fn default_medium_max() -> usize {
    15
}

/// Node type markers that identify a trigger-capable node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMarkers {
    #[serde(default = "default_webhook_marker")]
    pub webhook: String,
    #[serde(default = "default_cron_marker")]
    pub cron: String,
    #[serde(default = "default_http_marker")]
    pub http_request: String,
}

impl TriggerMarkers {
    /// Trigger type for an exact marker match.
    pub fn match_type(&self, node_type: &str) -> Option<TriggerType> {
        if node_type == self.webhook {
            Some(TriggerType::Webhook)
        } else if node_type == self.cron {
            Some(TriggerType::Scheduled)
        } else if node_type == self.http_request {
            Some(TriggerType::Http)
        } else {
            None
        }
    }
}

impl Default for TriggerMarkers {
    fn default() -> Self {
        Self {
            webhook: default_webhook_marker(),
            cron: default_cron_marker(),
            http_request: default_http_marker(),
        }
    }
}

fn default_webhook_marker() -> String {
    "n8n-nodes-base.webhook".to_string()
}

fn default_cron_marker() -> String {
    "n8n-nodes-base.cron".to_string()
}

fn default_http_marker() -> String {
    "n8n-nodes-base.httpRequest".to_string()
}

/// Everything the extractor needs besides the file itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRules {
    #[serde(flatten)]
    pub thresholds: ComplexityThresholds,

    #[serde(default)]
    pub markers: TriggerMarkers,

    /// Explicit names starting with any of these are ignored
    #[serde(default = "default_placeholder_prefixes")]
    pub placeholder_prefixes: Vec<String>,

    /// Lowercase filename token → display form
    #[serde(default = "default_token_overrides")]
    pub token_overrides: Vec<(String, String)>,
}

impl Default for AnalysisRules {
    fn default() -> Self {
        Self {
            thresholds: ComplexityThresholds::default(),
            markers: TriggerMarkers::default(),
            placeholder_prefixes: default_placeholder_prefixes(),
            token_overrides: default_token_overrides(),
        }
    }
}

fn default_placeholder_prefixes() -> Vec<String> {
    vec!["My workflow".to_string()]
}

fn default_token_overrides() -> Vec<(String, String)> {
    [
        ("http", "HTTP"),
        ("api", "API"),
        ("webhook", "Webhook"),
        ("automation", "Automation"),
        ("automate", "Automate"),
        ("scheduled", "Scheduled"),
        ("triggered", "Triggered"),
        ("manual", "Manual"),
        ("ai", "AI"),
        ("crm", "CRM"),
        ("url", "URL"),
        ("json", "JSON"),
        ("csv", "CSV"),
        ("sms", "SMS"),
        ("rss", "RSS"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// One category and the integration keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Built-in category table. Order is significant: the first match wins.
pub fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Communication",
            &[
                "slack", "discord", "telegram", "mattermost", "teams", "twilio", "whatsapp",
                "gmail", "email", "imap", "smtp", "matrix",
            ],
        ),
        CategoryRule::new(
            "CRM & Sales",
            &[
                "hubspot", "salesforce", "pipedrive", "zoho", "copper", "freshworks", "agilecrm",
                "activecampaign",
            ],
        ),
        CategoryRule::new(
            "AI & Machine Learning",
            &["openai", "anthropic", "langchain", "huggingface", "mistral", "ollama", "gemini"],
        ),
        CategoryRule::new(
            "Data Processing",
            &[
                "spreadsheet", "sheets", "airtable", "postgres", "mysql", "mongo", "redis",
                "supabase", "baserow", "csv",
            ],
        ),
        CategoryRule::new(
            "Project Management",
            &["jira", "trello", "asana", "clickup", "notion", "todoist", "monday", "linear"],
        ),
        CategoryRule::new(
            "Social Media",
            &["twitter", "facebook", "linkedin", "instagram", "reddit", "youtube", "mastodon"],
        ),
        CategoryRule::new(
            "E-commerce & Payments",
            &["shopify", "woocommerce", "stripe", "paypal", "magento", "gumroad", "chargebee"],
        ),
        CategoryRule::new(
            "Cloud Storage",
            &["dropbox", "drive", "s3", "box", "onedrive", "nextcloud", "ftp"],
        ),
        CategoryRule::new(
            "Developer Tools",
            &["github", "gitlab", "bitbucket", "jenkins", "docker", "sentry", "circleci"],
        ),
    ]
}
