//! Rust types for the chatflow JSON produced by the flow editor.
//!
//! Nodes keep the editor's React Flow shape (`id`, `type`, `position`,
//! `data.label`, `data.config`). The `type` tag selects a typed config; kinds
//! without rules decode into `NodeKind::Other` and keep their raw config.
//!
//! Decoding runs in two stages: serde reads the wire shape (`RawChatflow`,
//! `RawNode`), then `TryFrom` types each config so a bad config surfaces as
//! `ChatflowError::InvalidConfig`. Optional fields accept `null`.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ChatflowError;

// =============================================================================
// LENIENT FIELD DECODING
// =============================================================================

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accept a JSON number or a numeric string. Anything else decodes as `None`.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + DeserializeOwned,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => serde_json::from_value(Value::Number(n)).ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(number)
}

// =============================================================================
// TOP-LEVEL CHATFLOW
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Chatflow {
    pub id: String,
    pub name: String,
    pub nodes: Vec<ChatflowNode>,
    pub edges: Vec<ChatflowEdge>,
}

/// Wire form of a chatflow, decoded before node configs are typed.
#[derive(Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawChatflow {
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) nodes: Vec<RawNode>,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) edges: Vec<ChatflowEdge>,
}

impl TryFrom<RawChatflow> for Chatflow {
    type Error = ChatflowError;

    fn try_from(raw: RawChatflow) -> Result<Self, Self::Error> {
        let nodes = raw
            .nodes
            .into_iter()
            .map(ChatflowNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Chatflow {
            id: raw.id,
            name: raw.name,
            nodes,
            edges: raw.edges,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatflowEdge {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl ChatflowEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        ChatflowEdge {
            id: format!("{}->{}", source, target),
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ChatflowNode {
    pub id: String,
    pub label: String,
    pub position: Option<Position>,
    pub kind: NodeKind,
}

impl ChatflowNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        ChatflowNode {
            id: id.into(),
            label: label.into(),
            position: None,
            kind,
        }
    }

    /// Name used in diagnostics: the label, or the id when the label is blank.
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn is_trigger(&self) -> bool {
        self.tag() == KindTag::Trigger
    }

    pub fn is_end(&self) -> bool {
        self.tag() == KindTag::End
    }
}

/// Wire form of a node, decoded before the config is typed.
#[derive(Deserialize)]
pub(crate) struct RawNode {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default, deserialize_with = "null_as_default")]
    data: RawNodeData,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawNodeData {
    #[serde(deserialize_with = "null_as_default")]
    label: String,
    config: Value,
}

impl TryFrom<RawNode> for ChatflowNode {
    type Error = ChatflowError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let kind = NodeKind::decode(&raw.kind, raw.data.config)
            .map_err(|e| ChatflowError::invalid_config(&raw.id, &raw.kind, e))?;
        Ok(ChatflowNode {
            id: raw.id,
            label: raw.data.label,
            position: raw.position,
            kind,
        })
    }
}

/// Node kind with its kind-specific configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Trigger(TriggerConfig),
    End,
    Condition(ConditionConfig),
    Delay(DelayConfig),
    WaitReply(WaitReplyConfig),
    SendTemplate(SendTemplateConfig),
    GuestForm(GuestFormConfig),
    UpdateGuest(UpdateGuestConfig),
    /// Any kind without semantic rules (e.g. `send_message`).
    Other { kind: String, config: Value },
}

/// Fieldless discriminant of `NodeKind`, used as the rule registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Trigger,
    End,
    Condition,
    Delay,
    WaitReply,
    SendTemplate,
    GuestForm,
    UpdateGuest,
    Other,
}

impl NodeKind {
    /// Decode a kind tag and its raw config. A missing config decodes as `{}`.
    pub fn decode(kind: &str, config: Value) -> Result<NodeKind, serde_json::Error> {
        let node_kind = match kind {
            "trigger" => NodeKind::Trigger(typed_config(config)?),
            "end" => NodeKind::End,
            "condition" => NodeKind::Condition(typed_config(config)?),
            "delay" => NodeKind::Delay(typed_config(config)?),
            "wait_reply" => NodeKind::WaitReply(typed_config(config)?),
            "send_template" => NodeKind::SendTemplate(typed_config(config)?),
            "guest_form" => NodeKind::GuestForm(typed_config(config)?),
            "update_guest" => NodeKind::UpdateGuest(typed_config(config)?),
            other => NodeKind::Other {
                kind: other.to_string(),
                config,
            },
        };
        Ok(node_kind)
    }

    pub fn tag(&self) -> KindTag {
        match self {
            NodeKind::Trigger(_) => KindTag::Trigger,
            NodeKind::End => KindTag::End,
            NodeKind::Condition(_) => KindTag::Condition,
            NodeKind::Delay(_) => KindTag::Delay,
            NodeKind::WaitReply(_) => KindTag::WaitReply,
            NodeKind::SendTemplate(_) => KindTag::SendTemplate,
            NodeKind::GuestForm(_) => KindTag::GuestForm,
            NodeKind::UpdateGuest(_) => KindTag::UpdateGuest,
            NodeKind::Other { .. } => KindTag::Other,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NodeKind::Trigger(_) => "trigger",
            NodeKind::End => "end",
            NodeKind::Condition(_) => "condition",
            NodeKind::Delay(_) => "delay",
            NodeKind::WaitReply(_) => "wait_reply",
            NodeKind::SendTemplate(_) => "send_template",
            NodeKind::GuestForm(_) => "guest_form",
            NodeKind::UpdateGuest(_) => "update_guest",
            NodeKind::Other { kind, .. } => kind,
        }
    }
}

fn typed_config<C: DeserializeOwned>(config: Value) -> Result<C, serde_json::Error> {
    match config {
        Value::Null => serde_json::from_value(Value::Object(Default::default())),
        config => serde_json::from_value(config),
    }
}

// =============================================================================
// KIND CONFIGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TriggerConfig {
    #[serde(rename = "type")]
    pub trigger_type: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionConfig {
    pub variable: Option<String>,
    pub operator: Option<String>,
    /// Compared value; any JSON scalar the editor produced.
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DelayConfig {
    #[serde(deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaitReplyConfig {
    #[serde(deserialize_with = "lenient_number")]
    pub timeout: Option<f64>,
    pub variable: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendTemplateConfig {
    pub template_id: Option<String>,
    pub template_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub variables: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuestFormConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub questions: Vec<FormQuestion>,
    #[serde(deserialize_with = "lenient_number")]
    pub max_retries: Option<u32>,
    pub confirmation: Option<ConfirmationConfig>,
    pub on_max_retry: Option<MaxRetryConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormQuestion {
    #[serde(deserialize_with = "null_as_default")]
    pub variable: String,
    #[serde(deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub question_type: QuestionType,
    #[serde(deserialize_with = "null_as_default")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    Text,
    Number,
    Date,
    Choice,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfirmationConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    pub message: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub yes_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub no_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaxRetryConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub action: MaxRetryAction,
    pub jump_to_node_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxRetryAction {
    #[default]
    End,
    Continue,
    #[serde(alias = "jump_to_node")]
    Jump,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateGuestConfig {
    pub action: Option<UpdateGuestAction>,
    pub tag: Option<String>,
    pub rsvp_status: Option<String>,
    pub field: Option<String>,
    pub value: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub mappings: Vec<FieldMapping>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateGuestAction {
    AddTag,
    RemoveTag,
    UpdateRsvp,
    UpdateField,
    MapFromVariables,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldMapping {
    #[serde(deserialize_with = "null_as_default")]
    pub variable: String,
    #[serde(deserialize_with = "null_as_default")]
    pub field: String,
}
