//! End-to-end tests for the variables extension

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use varmark_dom::Node;
use varmark_surface::{Caret, Key, KeyDisposition, Surface, VariableEvent};
use varmark_variables::{VariablesExtension, ORIGINAL_ATTR};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn record_events(surface: &mut Surface) -> Arc<Mutex<Vec<VariableEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    surface.subscribe(move |event: &VariableEvent| sink.lock().unwrap().push(event.clone()));
    events
}

#[test]
fn test_roundtrip_is_byte_identical() -> anyhow::Result<()> {
    init_logging();
    let source = "Dear {user.name}, welcome to {company}. Yours, { staff name }";
    let mut surface = Surface::with_content("compose", source)?;
    let mut extension = VariablesExtension::new();

    extension.attach(&mut surface)?;
    assert_ne!(surface.content(), source, "markers were rendered");

    let raw = extension.open_source_view(&mut surface)?;
    assert_eq!(raw, source, "forward then reverse conversion is the identity");
    Ok(())
}

#[test]
fn test_allow_list_enforcement() -> anyhow::Result<()> {
    let mut surface = Surface::with_content("compose", "Hello {user.name} and {other}")?;
    surface.params_mut().variable_valid = Some(vec!["user.name".to_string()]);

    let mut extension = VariablesExtension::new();
    extension.attach(&mut surface)?;

    let content = surface.content();
    assert!(content.contains(r#"data-original-variable="{user.name}""#));
    assert!(content.contains("{other}"), "rejected name stays literal");
    assert!(!content.contains(r#"data-original-variable="{other}""#));
    Ok(())
}

#[test]
fn test_label_mapping_keeps_identity_attribute() -> anyhow::Result<()> {
    let mut surface = Surface::with_content("compose", "Hello {user.name}")?;
    surface.params_mut().variable_mappers = Some(BTreeMap::from([(
        "user.name".to_string(),
        "Name".to_string(),
    )]));

    let mut extension = VariablesExtension::new();
    let events = record_events(&mut surface);
    extension.attach(&mut surface)?;

    let path = surface
        .body()
        .find_by_attribute(ORIGINAL_ATTR, "{user.name}")
        .expect("marker exists");
    let marker = surface.body().node_at(&path).and_then(Node::as_element).unwrap();
    assert_eq!(marker.text_content(), "Name");
    assert_eq!(marker.attribute(ORIGINAL_ATTR), Some("{user.name}"));

    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[VariableEvent::Rendered {
            raw: "{user.name}".to_string(),
            label: "Name".to_string(),
        }]
    );
    Ok(())
}

#[test]
fn test_repeated_render_is_idempotent() -> anyhow::Result<()> {
    let mut surface = Surface::with_content("compose", "Hi {a} and {b}")?;
    let mut extension = VariablesExtension::new();
    let events = record_events(&mut surface);

    extension.attach(&mut surface)?;
    let rendered = surface.content();
    assert_eq!(events.lock().unwrap().len(), 2);

    // key-up re-render: no new markers, no changes, no new events
    extension.on_key_up(&mut surface);
    extension.on_key_up(&mut surface);
    assert_eq!(surface.content(), rendered);
    assert_eq!(events.lock().unwrap().len(), 2);
    Ok(())
}

#[test]
fn test_key_policy_end_to_end() -> anyhow::Result<()> {
    let mut surface = Surface::with_content("compose", "Hi {foo} there")?;
    let mut extension = VariablesExtension::new();
    let events = record_events(&mut surface);
    extension.attach(&mut surface)?;

    let path = surface.body().find_by_attribute(ORIGINAL_ATTR, "{foo}").unwrap();
    let marker_id = surface
        .body()
        .node_at(&path)
        .and_then(Node::as_element)
        .unwrap()
        .id
        .clone();
    surface.set_caret(Some(Caret {
        element_id: marker_id.clone(),
        child_index: 0,
        offset: 0,
    }));

    // printable char: suppressed, one modify-attempt, content unchanged
    let before = surface.content();
    let disposition = extension.on_key_down(&mut surface, Key::Char('q'))?;
    assert_eq!(disposition, KeyDisposition::Suppressed);
    assert_eq!(surface.content(), before);
    assert_eq!(
        events.lock().unwrap().len(),
        2, // one Rendered + one ModifyAttempt
    );

    // backspace: marker gone, exactly one deletion event
    let disposition = extension.on_key_down(&mut surface, Key::Backspace)?;
    assert_eq!(disposition, KeyDisposition::Default);
    assert_eq!(surface.content(), "Hi  there");

    let recorded = events.lock().unwrap();
    let deletions: Vec<_> = recorded
        .iter()
        .filter(|event| matches!(event, VariableEvent::Deleted { .. }))
        .collect();
    assert_eq!(deletions.len(), 1);
    Ok(())
}

#[test]
fn test_dialog_cancel_restores_rendered_form() -> anyhow::Result<()> {
    init_logging();
    let mut surface = Surface::with_content("compose", "try {foo} now")?;
    let mut extension = VariablesExtension::new();
    extension.attach(&mut surface)?;
    let rendered = surface.content();

    let raw = extension.open_source_view(&mut surface)?;
    assert_eq!(raw, "try {foo} now");
    extension.cancel_source_view(&mut surface)?;

    assert_eq!(surface.content(), rendered, "marker form, not raw text");
    Ok(())
}

#[test]
fn test_dialog_confirm_keeps_raw_until_next_change() -> anyhow::Result<()> {
    let mut surface = Surface::with_content("compose", "old {foo}")?;
    let mut extension = VariablesExtension::new();
    extension.attach(&mut surface)?;

    extension.open_source_view(&mut surface)?;
    extension.confirm_source_view(&mut surface, "new {bar}")?;
    assert_eq!(surface.content(), "new {bar}", "verbatim, no conversion yet");

    // the next content-change event re-renders
    extension.on_key_up(&mut surface);
    assert!(surface.content().contains(r#"data-original-variable="{bar}""#));
    Ok(())
}

#[test]
fn test_second_attach_to_same_surface_is_rejected() -> anyhow::Result<()> {
    let mut surface = Surface::with_content("compose", "{foo}")?;
    let mut first = VariablesExtension::new();
    let mut second = VariablesExtension::new();

    first.attach(&mut surface)?;
    assert!(second.attach(&mut surface).is_err());
    Ok(())
}

#[test]
fn test_independent_surfaces_with_independent_registries() -> anyhow::Result<()> {
    let mut inviting = Surface::with_content("invite", "Hi {user.name}")?;
    inviting.params_mut().variable_valid = Some(vec!["user.name".to_string()]);
    let mut billing = Surface::with_content("billing", "Hi {user.name}")?;
    billing.params_mut().variable_valid = Some(vec!["amount".to_string()]);

    let mut first = VariablesExtension::new();
    let mut second = VariablesExtension::new();
    first.attach(&mut inviting)?;
    second.attach(&mut billing)?;

    assert!(inviting.content().contains("data-original-variable"));
    assert_eq!(billing.content(), "Hi {user.name}", "name not in this registry");
    Ok(())
}

#[test]
fn test_event_payload_wire_shape() -> anyhow::Result<()> {
    let mut surface = Surface::with_content("compose", "{foo}")?;
    let events = record_events(&mut surface);
    VariablesExtension::new().attach(&mut surface)?;

    let payload = serde_json::to_value(&events.lock().unwrap()[0])?;
    assert_eq!(
        payload,
        serde_json::json!({"Rendered": {"raw": "{foo}", "label": "foo"}})
    );
    Ok(())
}

#[test]
fn test_serialized_marker_markup_remains_roundtrippable() -> anyhow::Result<()> {
    // a document persisted with marker markup years ago must still strip
    let persisted =
        r#"Dear <span class="variable" data-original-variable="{user.name}">Name</span>,"#;
    let mut surface = Surface::with_content("compose", persisted)?;
    let mut extension = VariablesExtension::new();
    extension.attach(&mut surface)?;

    let raw = extension.open_source_view(&mut surface)?;
    assert_eq!(raw, "Dear {user.name},");
    Ok(())
}
