use chatflow::model::*;

// =============================================================================
// Node builders
// =============================================================================

pub fn trigger(id: &str) -> ChatflowNode {
    ChatflowNode::new(id, id, NodeKind::Trigger(TriggerConfig::default()))
}

pub fn keyword_trigger(id: &str, keyword: &str) -> ChatflowNode {
    ChatflowNode::new(
        id,
        id,
        NodeKind::Trigger(TriggerConfig {
            trigger_type: Some("keyword".into()),
            keyword: Some(keyword.into()),
        }),
    )
}

pub fn end(id: &str) -> ChatflowNode {
    ChatflowNode::new(id, id, NodeKind::End)
}

pub fn condition(id: &str) -> ChatflowNode {
    ChatflowNode::new(
        id,
        id,
        NodeKind::Condition(ConditionConfig {
            variable: Some("age".into()),
            operator: Some("equals".into()),
            value: Some(serde_json::json!("18")),
        }),
    )
}

pub fn delay(id: &str, duration: Option<f64>) -> ChatflowNode {
    ChatflowNode::new(
        id,
        id,
        NodeKind::Delay(DelayConfig {
            duration,
            unit: Some("minutes".into()),
        }),
    )
}

pub fn passthrough(id: &str, kind: &str) -> ChatflowNode {
    ChatflowNode::new(
        id,
        id,
        NodeKind::Other {
            kind: kind.into(),
            config: serde_json::Value::Null,
        },
    )
}

pub fn guest_form(id: &str, config: GuestFormConfig) -> ChatflowNode {
    ChatflowNode::new(id, id, NodeKind::GuestForm(config))
}

pub fn update_guest(id: &str, config: UpdateGuestConfig) -> ChatflowNode {
    ChatflowNode::new(id, id, NodeKind::UpdateGuest(config))
}

pub fn question(variable: &str, text: &str) -> FormQuestion {
    FormQuestion {
        variable: variable.into(),
        question: text.into(),
        ..Default::default()
    }
}

pub fn with_label(mut node: ChatflowNode, label: &str) -> ChatflowNode {
    node.label = label.into();
    node
}

// =============================================================================
// Edge builders
// =============================================================================

pub fn edge(source: &str, target: &str) -> ChatflowEdge {
    ChatflowEdge::new(source, target)
}

pub fn chain(ids: &[&str]) -> Vec<ChatflowEdge> {
    ids.windows(2).map(|w| edge(w[0], w[1])).collect()
}

// =============================================================================
// Assertions
// =============================================================================

pub fn assert_has_code(diagnostics: &[chatflow::validate::Diagnostic], code: &str) {
    assert!(
        diagnostics.iter().any(|d| d.code == code),
        "Expected {}, got: {:?}",
        code,
        diagnostics
    );
}

pub fn assert_no_code(diagnostics: &[chatflow::validate::Diagnostic], code: &str) {
    assert!(
        !diagnostics.iter().any(|d| d.code == code),
        "Did not expect {}, but got: {:?}",
        code,
        diagnostics
    );
}
