//! Per-kind configuration rules.
//!
//! Each node kind with rules registers one check in `REGISTRY`. Kinds without
//! an entry (end, pass-through kinds) are never flagged here.

use std::collections::HashSet;

use crate::model::*;
use crate::validate::result::Diagnostic;

/// Facts about the surrounding flow that single-node rules may consult.
pub struct RuleContext<'a> {
    node_ids: HashSet<&'a str>,
}

impl<'a> RuleContext<'a> {
    pub fn from_nodes(nodes: &'a [ChatflowNode]) -> Self {
        RuleContext {
            node_ids: nodes.iter().map(|n| n.id.as_str()).collect(),
        }
    }

    pub fn from_ids(ids: impl IntoIterator<Item = &'a str>) -> Self {
        RuleContext {
            node_ids: ids.into_iter().collect(),
        }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }
}

pub type NodeCheck = fn(&ChatflowNode, &RuleContext<'_>, &mut Vec<Diagnostic>);

struct RuleEntry {
    kind: KindTag,
    check: NodeCheck,
}

const REGISTRY: &[RuleEntry] = &[
    RuleEntry { kind: KindTag::Trigger, check: check_trigger },
    RuleEntry { kind: KindTag::WaitReply, check: check_wait_reply },
    RuleEntry { kind: KindTag::Condition, check: check_condition },
    RuleEntry { kind: KindTag::Delay, check: check_delay },
    RuleEntry { kind: KindTag::SendTemplate, check: check_send_template },
    RuleEntry { kind: KindTag::GuestForm, check: check_guest_form },
    RuleEntry { kind: KindTag::UpdateGuest, check: check_update_guest },
];

pub fn check_for(kind: KindTag) -> Option<NodeCheck> {
    REGISTRY.iter().find(|e| e.kind == kind).map(|e| e.check)
}

/// Validate a single node's config. Returns all findings.
pub fn validate_node_config(node: &ChatflowNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if let Some(check) = check_for(node.tag()) {
        check(node, ctx, &mut diagnostics);
    }
    diagnostics
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

fn check_trigger(node: &ChatflowNode, _: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let NodeKind::Trigger(config) = &node.kind else { return };

    if config.trigger_type.as_deref() == Some("keyword") && is_blank(config.keyword.as_deref()) {
        out.push(Diagnostic::error(
            "N001",
            format!("Trigger \"{}\": keyword is required for keyword triggers", node.display_name()),
            Some(node.id.as_str()),
        ));
    }
}

fn check_wait_reply(node: &ChatflowNode, _: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let NodeKind::WaitReply(config) = &node.kind else { return };

    if config.timeout.is_some_and(|t| t < 0.0) {
        out.push(Diagnostic::error(
            "N002",
            format!("Wait reply \"{}\": timeout cannot be negative", node.display_name()),
            Some(node.id.as_str()),
        ));
    }
}

fn check_condition(node: &ChatflowNode, _: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let NodeKind::Condition(config) = &node.kind else { return };

    let value_missing = match &config.value {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if is_blank(config.variable.as_deref()) || value_missing {
        out.push(Diagnostic::error(
            "N003",
            format!("Condition \"{}\": variable and value are required", node.display_name()),
            Some(node.id.as_str()),
        ));
    }
}

fn check_delay(node: &ChatflowNode, _: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let NodeKind::Delay(config) = &node.kind else { return };

    if !config.duration.is_some_and(|d| d > 0.0) {
        out.push(Diagnostic::error(
            "N004",
            format!("Delay \"{}\": duration must be greater than 0", node.display_name()),
            Some(node.id.as_str()),
        ));
    }
}

fn check_send_template(node: &ChatflowNode, _: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let NodeKind::SendTemplate(config) = &node.kind else { return };

    if is_blank(config.template_id.as_deref()) {
        out.push(Diagnostic::error(
            "N005",
            format!("Send template \"{}\": a template must be selected", node.display_name()),
            Some(node.id.as_str()),
        ));
    }
}

fn check_guest_form(node: &ChatflowNode, ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let NodeKind::GuestForm(config) = &node.kind else { return };
    let name = node.display_name();
    let node_id = Some(node.id.as_str());

    if config.questions.is_empty() {
        out.push(Diagnostic::error(
            "N006",
            format!("Guest form \"{}\": at least one question is required", name),
            node_id,
        ));
    }

    for (i, q) in config.questions.iter().enumerate() {
        let n = i + 1;
        if q.variable.trim().is_empty() {
            out.push(Diagnostic::error(
                "N006",
                format!("Guest form \"{}\": question {} is missing a variable name", name, n),
                node_id,
            ));
        }
        if q.question.trim().is_empty() {
            out.push(Diagnostic::error(
                "N006",
                format!("Guest form \"{}\": question {} is missing question text", name, n),
                node_id,
            ));
        }
        if q.question_type == QuestionType::Choice && q.options.is_empty() {
            out.push(Diagnostic::error(
                "N006",
                format!("Guest form \"{}\": choice question {} needs at least one option", name, n),
                node_id,
            ));
        }
    }

    if let Some(confirmation) = config.confirmation.as_ref().filter(|c| c.enabled) {
        if is_blank(confirmation.message.as_deref()) {
            out.push(Diagnostic::warning(
                "N007",
                format!("Guest form \"{}\": confirmation is enabled without a confirmation message", name),
                node_id,
            ));
        }
        if confirmation.yes_keywords.is_empty() {
            out.push(Diagnostic::warning(
                "N007",
                format!("Guest form \"{}\": confirmation is enabled without yes keywords", name),
                node_id,
            ));
        }
        if confirmation.no_keywords.is_empty() {
            out.push(Diagnostic::warning(
                "N007",
                format!("Guest form \"{}\": confirmation is enabled without no keywords", name),
                node_id,
            ));
        }
    }

    if let Some(retry) = config.on_max_retry.as_ref().filter(|r| r.action == MaxRetryAction::Jump) {
        // Ids are compared verbatim; trimming only decides blankness.
        match retry.jump_to_node_id.as_deref().filter(|t| !t.trim().is_empty()) {
            None => out.push(Diagnostic::error(
                "N008",
                format!("Guest form \"{}\": max retry jump requires a target node", name),
                node_id,
            )),
            Some(target) if !ctx.has_node(target) => out.push(Diagnostic::error(
                "N008",
                format!(
                    "Guest form \"{}\": max retry jump target \"{}\" does not exist",
                    name, target
                ),
                node_id,
            )),
            Some(_) => {}
        }
    }
}

fn check_update_guest(node: &ChatflowNode, _: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let NodeKind::UpdateGuest(config) = &node.kind else { return };
    let name = node.display_name();
    let node_id = Some(node.id.as_str());

    let missing = |what: &str| {
        Diagnostic::error("N009", format!("Update guest \"{}\": {} is required", name, what), node_id)
    };

    match config.action {
        Some(UpdateGuestAction::AddTag | UpdateGuestAction::RemoveTag) => {
            if is_blank(config.tag.as_deref()) {
                out.push(missing("tag name"));
            }
        }
        Some(UpdateGuestAction::UpdateRsvp) => {
            if is_blank(config.rsvp_status.as_deref()) {
                out.push(missing("RSVP status"));
            }
        }
        Some(UpdateGuestAction::UpdateField) => {
            if is_blank(config.field.as_deref()) {
                out.push(missing("field name"));
            }
        }
        Some(UpdateGuestAction::MapFromVariables) => {
            if config.mappings.is_empty() {
                out.push(missing("at least one variable mapping"));
            }
            for (i, m) in config.mappings.iter().enumerate() {
                if m.variable.trim().is_empty() || m.field.trim().is_empty() {
                    out.push(Diagnostic::error(
                        "N009",
                        format!(
                            "Update guest \"{}\": mapping {} needs both a source variable and a target field",
                            name,
                            i + 1
                        ),
                        node_id,
                    ));
                }
            }
        }
        Some(UpdateGuestAction::Other) | None => {}
    }
}
