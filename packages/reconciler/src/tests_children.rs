/// Keyed children differ tests
use crate::*;
use sprig_vdom::VNode;

fn item(key: &str) -> VNode {
    VNode::element("li")
        .with_key(key)
        .with_child(VNode::text(key))
}

fn list(keys: &[&str]) -> VNode {
    VNode::element("ul").with_children(keys.iter().map(|key| item(key)))
}

struct Fixture {
    doc: Document,
    ul: NodeId,
}

impl Fixture {
    fn new(keys: &[&str]) -> Self {
        let mut doc = Document::new();
        let ul = create(&mut doc, &list(keys));
        let body = doc.body();
        doc.append_child(&body, &ul);
        doc.clear_journal();
        Self { doc, ul }
    }

    fn children(&self) -> Vec<NodeId> {
        self.doc.children(self.ul).to_vec()
    }

    fn texts(&self) -> Vec<String> {
        self.children()
            .into_iter()
            .map(|li| self.doc.text_content(li))
            .collect()
    }

    fn patch(&mut self, from: &[&str], to: &[&str]) {
        update(&mut self.doc, &self.ul, &list(from), &list(to));
    }

    fn count(&self, predicate: impl Fn(&Mutation) -> bool) -> usize {
        self.doc.journal().iter().filter(|m| predicate(m)).count()
    }

    fn creates(&self) -> usize {
        self.count(|m| matches!(m, Mutation::CreateElement { .. } | Mutation::CreateText { .. }))
    }

    fn moves(&self) -> usize {
        self.count(|m| matches!(m, Mutation::InsertBefore { .. } | Mutation::AppendChild { .. }))
    }

    fn removes(&self) -> usize {
        self.count(|m| matches!(m, Mutation::RemoveChild { .. }))
    }
}

#[test]
fn test_rotate_right_is_one_move() {
    let mut fixture = Fixture::new(&["a", "b", "c"]);
    let before = fixture.children();

    fixture.patch(&["a", "b", "c"], &["c", "a", "b"]);

    assert_eq!(fixture.texts(), vec!["c", "a", "b"]);
    assert_eq!(fixture.children(), vec![before[2], before[0], before[1]]);
    assert_eq!(fixture.moves(), 1);
    assert_eq!(fixture.creates(), 0);
    assert_eq!(fixture.removes(), 0);
}

/// Once a run starts it continues until an unknown key resets it, so a
/// rotation to the left keeps every node where it was.
#[test]
fn test_run_continues_past_contiguity_break() {
    let mut fixture = Fixture::new(&["a", "b", "c"]);
    let before = fixture.children();

    fixture.patch(&["a", "b", "c"], &["b", "c", "a"]);

    assert_eq!(fixture.children(), before);
    assert_eq!(fixture.moves(), 0);
    assert_eq!(fixture.creates(), 0);
    assert_eq!(fixture.removes(), 0);
}

#[test]
fn test_reverse_reuses_nodes() {
    let mut fixture = Fixture::new(&["a", "b", "c", "d"]);
    let mut before = fixture.children();
    before.reverse();

    fixture.patch(&["a", "b", "c", "d"], &["d", "c", "b", "a"]);

    assert_eq!(fixture.children(), before);
    assert_eq!(fixture.creates(), 0);
    assert_eq!(fixture.removes(), 0);
}

#[test]
fn test_swap() {
    let mut fixture = Fixture::new(&["a", "b", "c", "d"]);

    fixture.patch(&["a", "b", "c", "d"], &["a", "c", "b", "d"]);

    assert_eq!(fixture.texts(), vec!["a", "c", "b", "d"]);
    assert_eq!(fixture.creates(), 0);
}

#[test]
fn test_insert_in_middle() {
    let mut fixture = Fixture::new(&["a", "c"]);
    let before = fixture.children();

    fixture.patch(&["a", "c"], &["a", "b", "c"]);

    let after = fixture.children();
    assert_eq!(fixture.texts(), vec!["a", "b", "c"]);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[1]);
    // li + its text node
    assert_eq!(fixture.creates(), 2);
}

#[test]
fn test_remove_from_middle() {
    let mut fixture = Fixture::new(&["a", "b", "c"]);
    let before = fixture.children();

    fixture.patch(&["a", "b", "c"], &["a", "c"]);

    assert_eq!(fixture.children(), vec![before[0], before[2]]);
    assert_eq!(fixture.removes(), 1);
    assert_eq!(fixture.creates(), 0);
}

#[test]
fn test_replace_all_keys() {
    let mut fixture = Fixture::new(&["a", "b"]);

    fixture.patch(&["a", "b"], &["x", "y"]);

    assert_eq!(fixture.texts(), vec!["x", "y"]);
    assert_eq!(fixture.removes(), 2);
}

#[test]
fn test_clear_and_fill() {
    let mut fixture = Fixture::new(&["a", "b"]);
    fixture.patch(&["a", "b"], &[]);
    assert!(fixture.children().is_empty());

    fixture.doc.clear_journal();
    fixture.patch(&[], &["c"]);
    assert_eq!(fixture.texts(), vec!["c"]);
}

#[test]
fn test_unkeyed_append() {
    let prev = VNode::element("p")
        .with_child(VNode::element("span"))
        .with_child(VNode::text("x"));
    let next = prev.clone().with_child(VNode::element("em"));

    let mut doc = Document::new();
    let p = create(&mut doc, &prev);
    let before = doc.children(p).to_vec();
    doc.clear_journal();

    update(&mut doc, &p, &prev, &next);

    let after = doc.children(p).to_vec();
    assert_eq!(&after[..2], &before[..]);
    assert_eq!(doc.tag(after[2]), Some("em"));
    assert_eq!(
        doc.journal(),
        &[
            Mutation::CreateElement {
                node: after[2],
                tag: "em".to_string()
            },
            Mutation::AppendChild {
                parent: p,
                child: after[2]
            },
        ]
    );
}

#[test]
fn test_unkeyed_truncate() {
    let prev = VNode::element("p")
        .with_child(VNode::text("a"))
        .with_child(VNode::text("b"));
    let next = VNode::element("p").with_child(VNode::text("a"));

    let mut doc = Document::new();
    let p = create(&mut doc, &prev);
    doc.clear_journal();

    update(&mut doc, &p, &prev, &next);

    assert_eq!(doc.text_content(p), "a");
    assert_eq!(doc.journal().len(), 1);
}

#[test]
fn test_moved_child_is_also_patched() {
    let mut doc = Document::new();
    let prev = list(&["a", "b", "c"]);
    let ul = create(&mut doc, &prev);

    let next = VNode::element("ul").with_children([
        VNode::element("li").with_key("c").with_child(VNode::text("C!")),
        item("a"),
        item("b"),
    ]);
    update(&mut doc, &ul, &prev, &next);

    assert_eq!(doc.text_content(ul), "C!ab");
}

#[test]
fn test_replaced_child_is_the_one_moved() {
    let mut doc = Document::new();
    let prev = list(&["a", "b", "c"]);
    let ul = create(&mut doc, &prev);
    let before = doc.children(ul).to_vec();

    let next = VNode::element("ul").with_children([
        VNode::element("div").with_key("c").with_child(VNode::text("c")),
        item("a"),
        item("b"),
    ]);
    update(&mut doc, &ul, &prev, &next);

    let after = doc.children(ul).to_vec();
    assert_eq!(after.len(), 3);
    assert_eq!(doc.tag(after[0]), Some("div"));
    assert_eq!(&after[1..], &before[..2]);
    assert_eq!(doc.parent(&before[2]), None);
}

/// The last previous child with a duplicated key is the one reused; the
/// earlier one is removed and both next occurrences share the survivor.
#[test]
fn test_duplicate_keys_reuse_last_occurrence() {
    let mut fixture = Fixture::new(&["a", "a", "b"]);
    let before = fixture.children();

    fixture.patch(&["a", "a", "b"], &["b", "a", "a"]);

    assert_eq!(fixture.children(), vec![before[2], before[1]]);
    assert_eq!(fixture.doc.parent(&before[0]), None);
    assert_eq!(fixture.removes(), 1);
    assert_eq!(fixture.creates(), 0);
}
