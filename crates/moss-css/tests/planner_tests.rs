//! Integration tests for the query planner.

use moss_css::CompoundSelector;
use moss_css::selector::plan_description;
use moss_dom::{DomTree, ElementData, LookupTables, NodeId, NodeKind};

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

/// A wide document: `count` branches of `width` children each. Every
/// `<p>` carries class `foo`; exactly three branches carry `id="x"`.
/// Returns the tree, the body, and the `.foo` elements under the `#x`
/// branches.
fn big_document(count: usize, width: usize) -> (DomTree, NodeId, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let body = element_with(&mut tree, NodeId::ROOT, "body", &[]);
    let mut x_foos = Vec::new();
    let mut x_branches = 0;
    let stride = (count / 3).max(1);
    for branch in 0..count {
        let is_x = branch % stride == 0 && x_branches < 3;
        let div = if is_x {
            x_branches += 1;
            element_with(&mut tree, body, "div", &[("id", "x")])
        } else {
            element_with(&mut tree, body, "div", &[])
        };
        for _ in 0..width {
            let p = element_with(&mut tree, div, "p", &[("class", "foo")]);
            if is_x {
                x_foos.push(p);
            }
        }
    }
    (tree, body, x_foos)
}

#[test]
fn test_id_anchored_plan_is_chosen() {
    let (tree, body, foo_nodes) = big_document(100, 100);
    assert!(tree.descendant_element_count(NodeId::ROOT) > 10_000);
    let tables = LookupTables::build(&tree);

    let compound = CompoundSelector::parse("#x .foo").expect("selector parses");
    let selector = &compound.selectors[0];

    let description = plan_description(selector, &tree, body, &tables);
    assert!(
        description.starts_with("Start at '#x'"),
        "unexpected plan: {description}"
    );

    let found = selector.find(&tree, body, Some(&tables));
    assert_eq!(found.len(), foo_nodes.len());
    for node in &foo_nodes {
        assert!(found.contains(node));
    }
}

#[test]
fn test_planned_find_agrees_with_scan() {
    let (tree, body, _) = big_document(30, 10);
    let tables = LookupTables::build(&tree);

    for text in ["#x .foo", "div p", "body > div", ".foo", "p", "*"] {
        let compound = CompoundSelector::parse(text).expect("selector parses");
        for selector in &compound.selectors {
            let planned = selector.find(&tree, body, Some(&tables));
            let scanned = selector.find_by_scan(&tree, body);
            assert_eq!(planned, scanned, "selector '{text}' diverged");
        }
    }
}

#[test]
fn test_sibling_combinators_fall_back_to_subject_anchor() {
    let mut tree = DomTree::new();
    let body = element_with(&mut tree, NodeId::ROOT, "body", &[]);
    let _h1 = element_with(&mut tree, body, "h1", &[]);
    let p1 = element_with(&mut tree, body, "p", &[("class", "note")]);
    let _p2 = element_with(&mut tree, body, "p", &[("class", "note")]);
    let tables = LookupTables::build(&tree);

    let compound = CompoundSelector::parse("h1 + p.note").expect("selector parses");
    let selector = &compound.selectors[0];

    // `+` cannot be traversed from the h1 anchor; the plan must start
    // from the subject's own keys.
    let description = plan_description(selector, &tree, body, &tables);
    assert!(
        description.starts_with("Start at '.note'") || description.starts_with("Start at 'p'"),
        "unexpected plan: {description}"
    );

    let found = selector.find(&tree, body, Some(&tables));
    assert_eq!(found.len(), 1);
    assert!(found.contains(&p1));
}

#[test]
fn test_query_root_bounds_results() {
    let mut tree = DomTree::new();
    let body = element_with(&mut tree, NodeId::ROOT, "body", &[]);
    let left = element_with(&mut tree, body, "div", &[]);
    let right = element_with(&mut tree, body, "div", &[]);
    let in_left = element_with(&mut tree, left, "span", &[("class", "foo")]);
    let _in_right = element_with(&mut tree, right, "span", &[("class", "foo")]);
    let tables = LookupTables::build(&tree);

    let compound = CompoundSelector::parse(".foo").expect("selector parses");
    let selector = &compound.selectors[0];
    let found = selector.find(&tree, left, Some(&tables));
    assert_eq!(found.len(), 1);
    assert!(found.contains(&in_left));
}

#[test]
fn test_plans_are_memoized_in_the_tables() {
    let (tree, body, _) = big_document(30, 10);
    let tables = LookupTables::build(&tree);

    let compound = CompoundSelector::parse("#x .foo").expect("selector parses");
    let selector = &compound.selectors[0];
    let _ = plan_description(selector, &tree, body, &tables);
    assert!(tables.plan_cache().contains(&selector.to_string()));
}
