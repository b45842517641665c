//! Workflow document types.
//!
//! Input files are n8n-style exports. Only a handful of fields carry
//! meaning for the catalog; everything else is kept in untyped bags so
//! that nothing is lost when records are re-serialized.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A parsed workflow definition file.
///
/// # Example
///
/// ```json
/// {
///   "name": "Slack alerts",
///   "active": true,
///   "nodes": [
///     { "name": "Webhook", "type": "n8n-nodes-base.webhook" },
///     { "name": "Slack", "type": "n8n-nodes-base.slack" }
///   ],
///   "connections": {
///     "Webhook": { "main": [[{ "node": "Slack", "type": "main", "index": 0 }]] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    /// Source-system identifier (string or number in the wild)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Explicit title, often a placeholder like "My workflow 3"
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,

    #[serde(default, deserialize_with = "lenient_nodes")]
    pub nodes: Vec<WorkflowNode>,

    #[serde(default)]
    pub connections: ConnectionMap,

    /// Tags as plain strings or `{ "name": ... }` objects
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<Value>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,

    /// Everything else in the document
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowDocument {
    /// Identifier rendered as a string, if present.
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Tag names, accepting both string and object forms.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter_map(|tag| match tag {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj.get("name").and_then(|n| n.as_str()).map(String::from),
                _ => None,
            })
            .collect()
    }
}

/// A single step in a workflow.
///
/// Node payloads vary by node type, so only `name` and `type` are typed;
/// parameters, positions, credentials and the rest stay in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Node type marker, e.g. `n8n-nodes-base.httpRequest`
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowNode {
    pub fn new(name: Option<&str>, node_type: Option<&str>) -> Self {
        Self {
            name: name.map(String::from),
            node_type: node_type.map(String::from),
            extra: Map::new(),
        }
    }
}

// Metadata fields of the wrong shape read as absent. Only a document that
// is not a JSON object is rejected.

fn lenient_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<bool, D::Error> {
    Ok(Value::deserialize(d)?.as_bool().unwrap_or(false))
}

fn lenient_list<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Non-object entries still count as nodes, with no name or type.
fn lenient_nodes<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<WorkflowNode>, D::Error> {
    Ok(lenient_list(d)?
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Connection relation: source node key → output slot → ordered targets.
///
/// Built leniently from JSON. Slot entries may be flat target objects
/// (`[{ "node": "B" }]`) or n8n branch lists (`[[{ "node": "B" }]]`);
/// both are flattened into one ordered target list. Entries of any other
/// shape are dropped. Key order follows the source document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ConnectionMap {
    sources: Vec<SourceConnections>,
}

/// Output slots of one source node.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConnections {
    pub source: String,
    pub slots: Vec<OutputSlot>,
}

/// One named output slot and the node references it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSlot {
    pub name: String,
    pub targets: Vec<String>,
}

/// A single `source --slot--> target` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    pub source: &'a str,
    pub slot: &'a str,
    pub target: &'a str,
}

impl ConnectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a target under `source`/`slot`, creating either as needed.
    pub fn connect(&mut self, source: &str, slot: &str, target: &str) {
        let index = match self.sources.iter().position(|s| s.source == source) {
            Some(i) => i,
            None => {
                self.sources.push(SourceConnections {
                    source: source.to_string(),
                    slots: Vec::new(),
                });
                self.sources.len() - 1
            }
        };
        let entry = &mut self.sources[index];
        match entry.slots.iter_mut().find(|s| s.name == slot) {
            Some(existing) => existing.targets.push(target.to_string()),
            None => entry.slots.push(OutputSlot {
                name: slot.to_string(),
                targets: vec![target.to_string()],
            }),
        }
    }

    pub fn sources(&self) -> &[SourceConnections] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// All edges in source → slot → target order, duplicates included.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.sources.iter().flat_map(|src| {
            src.slots.iter().flat_map(move |slot| {
                slot.targets.iter().map(move |target| Edge {
                    source: &src.source,
                    slot: &slot.name,
                    target,
                })
            })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

impl From<Value> for ConnectionMap {
    fn from(value: Value) -> Self {
        let Value::Object(sources) = value else {
            return Self::default();
        };

        let mut map = Self::default();
        for (source, slots) in sources {
            let Value::Object(slots) = slots else {
                continue;
            };
            let mut parsed = Vec::new();
            for (slot, entries) in slots {
                let Value::Array(entries) = entries else {
                    continue;
                };
                let mut targets = Vec::new();
                for entry in &entries {
                    collect_targets(entry, &mut targets);
                }
                parsed.push(OutputSlot {
                    name: slot,
                    targets,
                });
            }
            map.sources.push(SourceConnections {
                source,
                slots: parsed,
            });
        }
        map
    }
}

fn collect_targets(entry: &Value, out: &mut Vec<String>) {
    match entry {
        Value::Object(obj) => match obj.get("node") {
            Some(Value::String(node)) => out.push(node.clone()),
            Some(Value::Number(node)) => out.push(node.to_string()),
            _ => {}
        },
        Value::Array(branch) => {
            for item in branch {
                if let Value::Object(_) = item {
                    collect_targets(item, out);
                }
            }
        }
        _ => {}
    }
}

impl Serialize for ConnectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(self.sources.len()))?;
        for src in &self.sources {
            let slots: Map<String, Value> = src
                .slots
                .iter()
                .map(|slot| {
                    let targets = slot
                        .targets
                        .iter()
                        .map(|t| serde_json::json!({ "node": t }))
                        .collect();
                    (slot.name.clone(), Value::Array(targets))
                })
                .collect();
            outer.serialize_entry(&src.source, &slots)?;
        }
        outer.end()
    }
}
