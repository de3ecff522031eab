/// Reconciler tests: decision table, attribute patching, idempotence
use crate::*;
use sprig_vdom::{AttrValue, Handler, VNode};

fn mounted(doc: &mut Document, vnode: &VNode) -> NodeId {
    let node = create(doc, vnode);
    let body = doc.body();
    doc.append_child(&body, &node);
    doc.clear_journal();
    node
}

fn card(title: &str, class: &str) -> VNode {
    VNode::element("div")
        .with_attr("class", class)
        .with_child(VNode::element("h2").with_child(VNode::text(title)))
        .with_child(VNode::element("p").with_child(VNode::number(3.0)))
}

#[test]
fn test_identical_snapshots_are_noop() {
    let mut doc = Document::new();
    let handler = Handler::new(|_| Ok(()));
    let vnode = card("Hello", "card").with_attr("onclick", AttrValue::Handler(handler));
    let live = mounted(&mut doc, &vnode);

    let result = update(&mut doc, &live, &vnode, &vnode.clone());

    assert_eq!(result, live);
    assert!(doc.journal().is_empty(), "unexpected mutations: {:?}", doc.journal());
}

#[test]
fn test_text_change_sets_text() {
    let mut doc = Document::new();
    let prev = card("Hello", "card");
    let live = mounted(&mut doc, &prev);

    let result = update(&mut doc, &live, &prev, &card("Bye", "card"));

    assert_eq!(result, live);
    assert_eq!(doc.journal().len(), 1);
    assert!(matches!(&doc.journal()[0], Mutation::SetText { text, .. } if text == "Bye"));
    assert_eq!(doc.text_content(live), "Bye3");
}

#[test]
fn test_primitive_kind_change_sets_text() {
    let mut doc = Document::new();
    let prev = VNode::element("p").with_child(VNode::number(1.0));
    let next = VNode::element("p").with_child(VNode::text("1"));
    let live = mounted(&mut doc, &prev);

    update(&mut doc, &live, &prev, &next);

    assert_eq!(doc.journal().len(), 1);
    assert!(matches!(doc.journal()[0], Mutation::SetText { .. }));
}

#[test]
fn test_tag_change_replaces() {
    let mut doc = Document::new();
    let prev = VNode::element("div").with_child(VNode::text("x"));
    let next = VNode::element("section").with_child(VNode::text("x"));
    let live = mounted(&mut doc, &prev);

    let result = update(&mut doc, &live, &prev, &next);

    assert_ne!(result, live);
    assert_eq!(doc.tag(result), Some("section"));
    assert_eq!(doc.children(doc.body()), &[result]);
    assert_eq!(doc.parent(&live), None);
    assert!(doc
        .journal()
        .iter()
        .any(|m| matches!(m, Mutation::ReplaceChild { new, old, .. } if *new == result && *old == live)));
}

#[test]
fn test_kind_change_replaces() {
    let mut doc = Document::new();
    let prev = VNode::element("p").with_child(VNode::text("x"));
    let next = VNode::element("p").with_child(VNode::element("b"));
    let live = mounted(&mut doc, &prev);
    let old_child = doc.children(live)[0];

    update(&mut doc, &live, &prev, &next);

    let new_child = doc.children(live)[0];
    assert_ne!(new_child, old_child);
    assert_eq!(doc.tag(new_child), Some("b"));
}

#[test]
fn test_detached_replacement_is_returned() {
    let mut doc = Document::new();
    let prev = VNode::element("div");
    let live = create(&mut doc, &prev);
    doc.clear_journal();

    let result = update(&mut doc, &live, &prev, &VNode::element("span"));

    assert_ne!(result, live);
    assert_eq!(doc.parent(&result), None);
    assert!(!doc.journal().iter().any(Mutation::is_structural));
}

#[test]
fn test_attribute_patching() {
    let mut doc = Document::new();
    let prev = VNode::element("input")
        .with_attr("type", "text")
        .with_attr("placeholder", "name")
        .with_attr("class", "a");
    let next = VNode::element("input")
        .with_attr("type", "text")
        .with_attr("class", "b")
        .with_attr("disabled", "true");
    let live = mounted(&mut doc, &prev);

    update(&mut doc, &live, &prev, &next);

    assert_eq!(doc.class_name(live), Some("b"));
    assert!(doc.is_disabled(live));
    assert_eq!(doc.attribute(live, "placeholder"), None);
    assert_eq!(doc.attribute(live, "type"), Some("text"));
    // class, disabled, placeholder; `type` untouched
    assert_eq!(doc.journal().len(), 3);
}

#[test]
fn test_new_handler_is_applied() {
    let mut doc = Document::new();
    let first = Handler::new(|_| Ok(()));
    let second = Handler::new(|_| Ok(()));
    let prev = VNode::element("button").with_attr("onclick", AttrValue::Handler(first));
    let next = VNode::element("button").with_attr("onclick", AttrValue::Handler(second.clone()));
    let live = mounted(&mut doc, &prev);

    update(&mut doc, &live, &prev, &next);

    assert_eq!(doc.handler(&live, "onclick"), Some(second));
    assert_eq!(doc.journal().len(), 1);
}

#[test]
fn test_handler_to_text_switches_slot() {
    let mut doc = Document::new();
    let prev = VNode::element("a").with_attr("onclick", AttrValue::Handler(Handler::new(|_| Ok(()))));
    let next = VNode::element("a").with_attr("onclick", "plain");
    let live = mounted(&mut doc, &prev);

    update(&mut doc, &live, &prev, &next);

    assert_eq!(doc.handler(&live, "onclick"), None);
    assert_eq!(doc.attribute(live, "onclick"), Some("plain"));
}

#[test]
fn test_textarea_update() {
    let mut doc = Document::new();
    let prev = VNode::element("textarea").with_child(VNode::text("draft"));
    let next = VNode::element("textarea").with_child(VNode::text("final"));
    let live = mounted(&mut doc, &prev);

    update(&mut doc, &live, &prev, &next);

    assert_eq!(doc.value(live), Some("final"));
    assert!(doc.children(live).is_empty());
    assert_eq!(
        doc.journal(),
        &[Mutation::SetProperty {
            node: live,
            property: Property::Value("final".to_string())
        }]
    );
}

#[test]
fn test_determinism_across_documents() {
    let prev = card("Hello", "card");
    let next = card("World", "card active").with_child(VNode::text("extra"));

    let journals: Vec<Vec<Mutation>> = (0..5)
        .map(|_| {
            let mut doc = Document::new();
            let live = mounted(&mut doc, &prev);
            update(&mut doc, &live, &prev, &next);
            doc.take_journal()
        })
        .collect();

    for journal in &journals[1..] {
        assert_eq!(journal, &journals[0]);
    }
}

#[test]
fn test_update_matches_fresh_build() {
    let prev = card("Hello", "card");
    let next = card("World", "card active").with_child(VNode::element("footer"));

    let mut patched = Document::new();
    let live = mounted(&mut patched, &prev);
    let live = update(&mut patched, &live, &prev, &next);

    let mut fresh = Document::new();
    let built = create(&mut fresh, &next);

    assert_eq!(patched.to_html(live), fresh.to_html(built));
}

#[test]
fn test_children_survive_inner_html_round_trip() {
    let mut doc = Document::new();
    let first = VNode::element("div").with_child(VNode::text("a"));
    let raw = VNode::element("div")
        .with_attr("html", "<b>x</b>")
        .with_child(VNode::text("fallback"));
    let last = VNode::element("div").with_child(VNode::text("fallback"));
    let live = mounted(&mut doc, &first);

    let live = update(&mut doc, &live, &first, &raw);
    assert!(doc.children(live).is_empty());
    assert_eq!(doc.to_html(live), "<div><b>x</b></div>");

    let live = update(&mut doc, &live, &raw, &last);
    assert_eq!(doc.inner_html(live), Some(""));
    assert_eq!(doc.to_html(live), "<div>fallback</div>");
}
