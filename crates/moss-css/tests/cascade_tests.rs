//! Integration tests for the cascade: specificity, importance, source
//! order, inheritance, and the CSS-wide keywords.

use std::collections::HashMap;

use moss_css::value::{Color, Measure};
use moss_css::{ComputedStyle, StyleManager};
use moss_dom::{DomTree, ElementData, NodeId, NodeKind};

fn element_with(
    tree: &mut DomTree,
    parent: NodeId,
    tag: &str,
    attrs: &[(&str, &str)],
) -> NodeId {
    let mut data = ElementData::new(tag);
    for (name, value) in attrs {
        data.set_attribute(name, value);
    }
    let id = tree.alloc(NodeKind::Element(data));
    tree.append_child(parent, id);
    id
}

/// Compute styles for every element in document order, inheriting down
/// the tree.
fn compute_tree_styles(manager: &StyleManager, tree: &DomTree) -> HashMap<NodeId, ComputedStyle> {
    let mut styles = HashMap::new();
    for node in tree.descendants(tree.root()) {
        if tree.as_element(node).is_none() {
            continue;
        }
        let parent_style = tree
            .parent(node)
            .and_then(|p| styles.get(&p))
            .cloned();
        let style = manager.compute_style(tree, node, parent_style.as_ref());
        let _ = styles.insert(node, style);
    }
    styles
}

const ORANGE: Color = Color::rgb(255, 165, 0);
const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 128, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

#[test]
fn test_descendant_specificity_and_shorthand() {
    // `.foo .foo` beats `.foo` on the nested span; `background` expands
    // to background-color on both.
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet(
        ".foo .foo { color: orange; } .foo { color: red; background: green; }",
        "test.css",
    );

    let mut tree = DomTree::new();
    let div_foo = element_with(&mut tree, NodeId::ROOT, "div", &[("class", "foo")]);
    let div_bar = element_with(&mut tree, div_foo, "div", &[("class", "bar")]);
    let _span_qux = element_with(&mut tree, div_bar, "span", &[("class", "qux")]);
    let span_foo = element_with(&mut tree, div_bar, "span", &[("class", "foo")]);

    let styles = compute_tree_styles(&manager, &tree);

    let span_style = &styles[&span_foo];
    assert_eq!(span_style.color(), ORANGE);
    assert_eq!(span_style.background_color(), GREEN);

    let div_style = &styles[&div_foo];
    assert_eq!(div_style.color(), RED);
    assert_eq!(div_style.background_color(), GREEN);
}

#[test]
fn test_source_order_breaks_ties() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet("p { color: blue; } p { color: red; }", "test.css");

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[]);
    assert_eq!(manager.compute_style(&tree, p, None).color(), RED);
}

#[test]
fn test_later_stylesheet_wins_ties() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet("p { color: blue; }", "first.css");
    let _ = manager.add_stylesheet("p { color: red; }", "second.css");

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[]);
    assert_eq!(manager.compute_style(&tree, p, None).color(), RED);
}

#[test]
fn test_important_overrides_higher_specificity() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet(
        "#x { color: blue; } p { color: red !important; }",
        "test.css",
    );

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[("id", "x")]);
    assert_eq!(manager.compute_style(&tree, p, None).color(), RED);
}

#[test]
fn test_higher_specificity_wins_otherwise() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet("#x { color: blue; } p { color: red; }", "test.css");

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[("id", "x")]);
    assert_eq!(manager.compute_style(&tree, p, None).color(), BLUE);
}

#[test]
fn test_color_inherits() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet("div { color: green; }", "test.css");

    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, "div", &[]);
    let span = element_with(&mut tree, div, "span", &[]);

    let styles = compute_tree_styles(&manager, &tree);
    assert_eq!(styles[&span].color(), GREEN);
}

#[test]
fn test_background_does_not_inherit() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet("div { background-color: green; }", "test.css");

    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, "div", &[]);
    let span = element_with(&mut tree, div, "span", &[]);

    let styles = compute_tree_styles(&manager, &tree);
    assert_eq!(styles[&div].background_color(), GREEN);
    assert_eq!(styles[&span].background_color(), Color::TRANSPARENT);
}

#[test]
fn test_explicit_inherit_on_non_inherited_property() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet(
        "div { background-color: green; } span { background-color: inherit; }",
        "test.css",
    );

    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, "div", &[]);
    let span = element_with(&mut tree, div, "span", &[]);

    let styles = compute_tree_styles(&manager, &tree);
    assert_eq!(styles[&span].background_color(), GREEN);
}

#[test]
fn test_explicit_initial_resets_inherited_property() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet(
        "div { color: green; } span { color: initial; }",
        "test.css",
    );

    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, "div", &[]);
    let span = element_with(&mut tree, div, "span", &[]);

    let styles = compute_tree_styles(&manager, &tree);
    assert_eq!(styles[&span].color(), Color::BLACK);
}

#[test]
fn test_unset_is_a_no_op() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet(
        "div { color: green; } span { color: unset; }",
        "test.css",
    );

    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, "div", &[]);
    let span = element_with(&mut tree, div, "span", &[]);

    let styles = compute_tree_styles(&manager, &tree);
    // The inherited value flows through untouched.
    assert_eq!(styles[&span].color(), GREEN);
}

#[test]
fn test_shorthand_competes_as_longhands() {
    // A later, equally specific margin-left overrides that part of the
    // earlier margin shorthand.
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet(
        "p { margin: 10px; } p { margin-left: 30px; }",
        "test.css",
    );

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[]);
    let style = manager.compute_style(&tree, p, None);
    assert_eq!(style.sizes().margin.top, Measure::px(10.0));
    assert_eq!(style.sizes().margin.left, Measure::px(30.0));
}

#[test]
fn test_important_shorthand_part_resists_later_longhand() {
    let mut manager = StyleManager::new();
    let _ = manager.add_stylesheet(
        "p { margin: 10px !important; } p { margin-left: 30px; }",
        "test.css",
    );

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[]);
    let style = manager.compute_style(&tree, p, None);
    assert_eq!(style.sizes().margin.left, Measure::px(10.0));
}

#[test]
fn test_malformed_selector_produces_no_rule() {
    let messages = moss_css::Messages::new();
    let mut manager = StyleManager::with_messages(messages.clone());
    let _ = manager.add_stylesheet(
        "p[ { color: blue; } span { color: red; }",
        "test.css",
    );
    assert!(messages.has_errors());

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[]);
    let span = element_with(&mut tree, NodeId::ROOT, "span", &[]);
    // The broken rule matches nothing; the sheet recovered for the next
    // rule.
    assert_eq!(manager.compute_style(&tree, p, None).color(), Color::BLACK);
    assert_eq!(manager.compute_style(&tree, span, None).color(), RED);
}

#[test]
fn test_at_rules_are_skipped_with_a_warning() {
    let messages = moss_css::Messages::new();
    let mut manager = StyleManager::with_messages(messages.clone());
    let sheet = manager.add_stylesheet(
        "@import url(other.css); @media screen { p { color: blue; } } span { color: red; }",
        "test.css",
    );
    // Both at-rules were dropped; the plain rule survived.
    assert_eq!(sheet.rules().len(), 1);
    assert!(!messages.is_empty());

    let mut tree = DomTree::new();
    let span = element_with(&mut tree, NodeId::ROOT, "span", &[]);
    assert_eq!(manager.compute_style(&tree, span, None).color(), RED);
}

#[test]
fn test_removing_a_stylesheet_removes_its_rules() {
    let mut manager = StyleManager::new();
    let first = manager.add_stylesheet("p { color: blue; }", "first.css");
    let _ = manager.add_stylesheet("p { width: 5px; }", "second.css");

    let mut tree = DomTree::new();
    let p = element_with(&mut tree, NodeId::ROOT, "p", &[]);
    assert_eq!(manager.compute_style(&tree, p, None).color(), BLUE);

    assert!(manager.remove_stylesheet(&first));
    let style = manager.compute_style(&tree, p, None);
    assert_eq!(style.color(), Color::BLACK);
    assert_eq!(style.width(), Measure::px(5.0));
}
