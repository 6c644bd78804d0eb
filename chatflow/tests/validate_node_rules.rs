//! Integration tests for per-kind configuration rules (N001–N009).

#[allow(dead_code)]
mod helpers;

use chatflow::model::*;
use chatflow::validate::{self, Severity, node_rules};
use helpers::*;

fn check(node: &ChatflowNode, known_ids: &[&str]) -> Vec<validate::Diagnostic> {
    validate::validate_node(node, known_ids.iter().copied())
}

fn messages(diagnostics: &[validate::Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

fn valid_form() -> GuestFormConfig {
    GuestFormConfig {
        questions: vec![question("name", "What is your name?")],
        ..Default::default()
    }
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn kinds_without_rules_are_not_registered() {
    assert!(node_rules::check_for(KindTag::End).is_none());
    assert!(node_rules::check_for(KindTag::Other).is_none());
    assert!(node_rules::check_for(KindTag::GuestForm).is_some());
}

#[test]
fn passthrough_kinds_never_raise() {
    let node = ChatflowNode::new(
        "x",
        "Webhook",
        NodeKind::Other {
            kind: "webhook".into(),
            config: serde_json::json!({ "url": null, "duration": -5 }),
        },
    );
    assert!(check(&node, &[]).is_empty());
}

// =============================================================================
// N001: trigger
// =============================================================================

#[test]
fn n001_keyword_trigger_requires_keyword() {
    let node = with_label(keyword_trigger("t1", "   "), "Start");
    let diagnostics = check(&node, &[]);
    assert_eq!(
        messages(&diagnostics),
        vec!["Trigger \"Start\": keyword is required for keyword triggers"]
    );
    assert_eq!(diagnostics[0].code, "N001");
}

#[test]
fn n001_other_trigger_types_need_no_keyword() {
    let node = ChatflowNode::new(
        "t1",
        "Start",
        NodeKind::Trigger(TriggerConfig {
            trigger_type: Some("manual".into()),
            keyword: None,
        }),
    );
    assert!(check(&node, &[]).is_empty());
    assert!(check(&keyword_trigger("t2", "RSVP"), &[]).is_empty());
}

// =============================================================================
// N002: wait_reply
// =============================================================================

#[test]
fn n002_negative_timeout() {
    let wait = |timeout| {
        ChatflowNode::new(
            "w1",
            "Wait",
            NodeKind::WaitReply(WaitReplyConfig {
                timeout,
                variable: None,
            }),
        )
    };
    assert_eq!(
        messages(&check(&wait(Some(-1.0)), &[])),
        vec!["Wait reply \"Wait\": timeout cannot be negative"]
    );
    assert!(check(&wait(Some(0.0)), &[]).is_empty());
    assert!(check(&wait(None), &[]).is_empty());
}

// =============================================================================
// N003: condition
// =============================================================================

#[test]
fn n003_condition_requires_variable_and_value() {
    let cond = |variable: Option<&str>, value: Option<serde_json::Value>| {
        ChatflowNode::new(
            "c1",
            "Check",
            NodeKind::Condition(ConditionConfig {
                variable: variable.map(str::to_string),
                operator: None,
                value,
            }),
        )
    };

    assert_has_code(&check(&cond(None, Some(serde_json::json!("18"))), &[]), "N003");
    assert_has_code(&check(&cond(Some("age"), None), &[]), "N003");
    assert_has_code(&check(&cond(Some("age"), Some(serde_json::json!(""))), &[]), "N003");
    assert!(check(&cond(Some("age"), Some(serde_json::json!(0))), &[]).is_empty());
    assert!(check(&cond(Some("vip"), Some(serde_json::json!(false))), &[]).is_empty());

    let both_missing = check(&cond(None, None), &[]);
    assert_eq!(
        messages(&both_missing),
        vec!["Condition \"Check\": variable and value are required"]
    );
}

// =============================================================================
// N004: delay
// =============================================================================

#[test]
fn n004_delay_duration_must_be_positive() {
    assert_has_code(&check(&delay("d1", None), &[]), "N004");
    assert_has_code(&check(&delay("d1", Some(0.0)), &[]), "N004");
    assert_has_code(&check(&delay("d1", Some(-3.0)), &[]), "N004");
    assert!(check(&delay("d1", Some(0.5)), &[]).is_empty());
}

// =============================================================================
// N005: send_template
// =============================================================================

#[test]
fn n005_template_must_be_selected() {
    let node = ChatflowNode::new(
        "s1",
        "Invite",
        NodeKind::SendTemplate(SendTemplateConfig {
            template_name: Some("invite".into()),
            ..Default::default()
        }),
    );
    assert_eq!(
        messages(&check(&node, &[])),
        vec!["Send template \"Invite\": a template must be selected"]
    );
}

// =============================================================================
// N006–N008: guest_form
// =============================================================================

#[test]
fn n006_form_needs_questions() {
    let node = guest_form("f1", GuestFormConfig::default());
    assert_eq!(
        messages(&check(&node, &[])),
        vec!["Guest form \"f1\": at least one question is required"]
    );
}

#[test]
fn n006_each_question_is_checked() {
    let mut choice = question("meal", "Meal?");
    choice.question_type = QuestionType::Choice;
    let config = GuestFormConfig {
        questions: vec![question("", "Name?"), question("age", " "), choice],
        ..Default::default()
    };
    let diagnostics = check(&guest_form("f1", config), &[]);
    assert_eq!(
        messages(&diagnostics),
        vec![
            "Guest form \"f1\": question 1 is missing a variable name",
            "Guest form \"f1\": question 2 is missing question text",
            "Guest form \"f1\": choice question 3 needs at least one option",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn n007_incomplete_confirmation_only_warns() {
    let config = GuestFormConfig {
        confirmation: Some(ConfirmationConfig {
            enabled: true,
            message: None,
            yes_keywords: vec!["yes".into()],
            no_keywords: vec![],
        }),
        ..valid_form()
    };
    let diagnostics = check(&guest_form("f1", config), &[]);
    assert_eq!(
        messages(&diagnostics),
        vec![
            "Guest form \"f1\": confirmation is enabled without a confirmation message",
            "Guest form \"f1\": confirmation is enabled without no keywords",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn n007_disabled_confirmation_is_ignored() {
    let config = GuestFormConfig {
        confirmation: Some(ConfirmationConfig::default()),
        ..valid_form()
    };
    assert!(check(&guest_form("f1", config), &[]).is_empty());
}

#[test]
fn n008_jump_requires_target() {
    let config = GuestFormConfig {
        on_max_retry: Some(MaxRetryConfig {
            action: MaxRetryAction::Jump,
            jump_to_node_id: None,
        }),
        ..valid_form()
    };
    assert_eq!(
        messages(&check(&guest_form("f1", config), &["f1"])),
        vec!["Guest form \"f1\": max retry jump requires a target node"]
    );
}

#[test]
fn n008_jump_target_must_exist() {
    let config = GuestFormConfig {
        on_max_retry: Some(MaxRetryConfig {
            action: MaxRetryAction::Jump,
            jump_to_node_id: Some("e404".into()),
        }),
        ..valid_form()
    };
    let node = guest_form("f1", config);
    assert_eq!(
        messages(&check(&node, &["f1", "e1"])),
        vec!["Guest form \"f1\": max retry jump target \"e404\" does not exist"]
    );
    assert!(check(&node, &["f1", "e404"]).is_empty());
}

#[test]
fn n008_jump_target_is_matched_verbatim() {
    let jump_to = |target: &str| {
        guest_form(
            "f1",
            GuestFormConfig {
                on_max_retry: Some(MaxRetryConfig {
                    action: MaxRetryAction::Jump,
                    jump_to_node_id: Some(target.into()),
                }),
                ..valid_form()
            },
        )
    };

    assert_eq!(
        messages(&check(&jump_to(" e1 "), &["f1", "e1"])),
        vec!["Guest form \"f1\": max retry jump target \" e1 \" does not exist"]
    );
    assert!(check(&jump_to(" e1"), &["f1", " e1"]).is_empty());
    assert_eq!(
        messages(&check(&jump_to("   "), &["f1", "   "])),
        vec!["Guest form \"f1\": max retry jump requires a target node"]
    );
}

#[test]
fn n008_target_ignored_unless_action_is_jump() {
    let config = GuestFormConfig {
        on_max_retry: Some(MaxRetryConfig {
            action: MaxRetryAction::End,
            jump_to_node_id: Some("nowhere".into()),
        }),
        ..valid_form()
    };
    assert!(check(&guest_form("f1", config), &["f1"]).is_empty());
}

// =============================================================================
// N009: update_guest
// =============================================================================

#[test]
fn n009_action_specific_requirements() {
    let with_action = |action| UpdateGuestConfig {
        action: Some(action),
        ..Default::default()
    };

    let cases = [
        (UpdateGuestAction::AddTag, "Update guest \"u1\": tag name is required"),
        (UpdateGuestAction::RemoveTag, "Update guest \"u1\": tag name is required"),
        (UpdateGuestAction::UpdateRsvp, "Update guest \"u1\": RSVP status is required"),
        (UpdateGuestAction::UpdateField, "Update guest \"u1\": field name is required"),
        (
            UpdateGuestAction::MapFromVariables,
            "Update guest \"u1\": at least one variable mapping is required",
        ),
    ];
    for (action, expected) in cases {
        let diagnostics = check(&update_guest("u1", with_action(action)), &[]);
        assert_eq!(messages(&diagnostics), vec![expected], "action {:?}", action);
    }
}

#[test]
fn n009_satisfied_actions_pass() {
    let tagged = UpdateGuestConfig {
        action: Some(UpdateGuestAction::AddTag),
        tag: Some("vip".into()),
        ..Default::default()
    };
    let rsvp = UpdateGuestConfig {
        action: Some(UpdateGuestAction::UpdateRsvp),
        rsvp_status: Some("attending".into()),
        ..Default::default()
    };
    assert!(check(&update_guest("u1", tagged), &[]).is_empty());
    assert!(check(&update_guest("u2", rsvp), &[]).is_empty());
}

#[test]
fn n009_every_mapping_needs_both_sides() {
    let config = UpdateGuestConfig {
        action: Some(UpdateGuestAction::MapFromVariables),
        mappings: vec![
            FieldMapping { variable: "meal".into(), field: "meal".into() },
            FieldMapping { variable: "".into(), field: "pax".into() },
            FieldMapping { variable: "notes".into(), field: "".into() },
        ],
        ..Default::default()
    };
    assert_eq!(
        messages(&check(&update_guest("u1", config), &[])),
        vec![
            "Update guest \"u1\": mapping 2 needs both a source variable and a target field",
            "Update guest \"u1\": mapping 3 needs both a source variable and a target field",
        ]
    );
}

#[test]
fn n009_unknown_or_missing_action_passes() {
    let unknown = UpdateGuestConfig {
        action: Some(UpdateGuestAction::Other),
        ..Default::default()
    };
    assert!(check(&update_guest("u1", unknown), &[]).is_empty());
    assert!(check(&update_guest("u2", UpdateGuestConfig::default()), &[]).is_empty());
}
