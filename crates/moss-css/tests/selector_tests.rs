//! Integration tests for selector parsing, matching, and queries.

use moss_css::selector::{AttrOp, CaseMode, Combinator, SelectorFilter};
use moss_css::{CompoundSelector, Specificity};
use moss_dom::{DomTree, ElementData, NodeId, NodeKind, StyleFlags};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeKind::Element(ElementData::new(tag)));
    tree.append_child(parent, id);
    id
}

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

fn parse(text: &str) -> CompoundSelector {
    CompoundSelector::parse(text).unwrap_or_else(|e| panic!("selector '{text}' failed: {e}"))
}

#[test]
fn test_parse_simple_selectors() {
    let compound = parse("div.header#main[href][lang|=en]");
    assert_eq!(compound.selectors.len(), 1);
    let simple = compound.selectors[0].subject();
    assert_eq!(simple.element_name, "div");
    assert_eq!(simple.filters.len(), 4);
    assert_eq!(simple.filters[0], SelectorFilter::Class("header".to_string()));
    assert_eq!(simple.filters[1], SelectorFilter::Id("main".to_string()));
    assert_eq!(
        simple.filters[2],
        SelectorFilter::HasAttribute("href".to_string())
    );
    assert_eq!(
        simple.filters[3],
        SelectorFilter::Attribute {
            op: AttrOp::DashMatch,
            name: "lang".to_string(),
            value: "en".to_string(),
            case: CaseMode::Default,
        }
    );
}

#[test]
fn test_parse_combinators() {
    let compound = parse("ul > li + li a, p ~ span");
    assert_eq!(compound.selectors.len(), 2);
    let combinators: Vec<Combinator> = compound.selectors[0]
        .components()
        .iter()
        .map(|c| c.combinator)
        .collect();
    assert_eq!(
        combinators,
        vec![
            Combinator::None,
            Combinator::Child,
            Combinator::NextSibling,
            Combinator::Descendant,
        ]
    );
    assert_eq!(
        compound.selectors[1].components()[1].combinator,
        Combinator::SubsequentSibling
    );
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(CompoundSelector::try_parse("").is_none());
    assert!(CompoundSelector::try_parse("..foo").is_none());
    assert!(CompoundSelector::try_parse("div >").is_none());
    assert!(CompoundSelector::try_parse("[unclosed").is_none());
    assert!(CompoundSelector::try_parse("div {").is_none());
}

#[test]
fn test_specificity_counts() {
    assert_eq!(parse("div").specificity(), Specificity::from_counts(0, 0, 1));
    assert_eq!(parse(".a.b").specificity(), Specificity::from_counts(0, 2, 0));
    assert_eq!(
        parse("#x div.cls[href]:hover").specificity(),
        Specificity::from_counts(1, 3, 1)
    );
    // A comma list takes the maximum of its members.
    assert_eq!(
        parse("div, #x, .cls").specificity(),
        Specificity::from_counts(1, 0, 0)
    );
}

#[test]
fn test_type_and_universal_matching() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div");
    let span = element(&mut tree, div, "span");

    assert!(parse("div").is_match(&tree, div));
    assert!(!parse("div").is_match(&tree, span));
    assert!(parse("*").is_match(&tree, span));
    assert!(parse("DIV").is_match(&tree, div));
}

#[test]
fn test_class_and_id_matching() {
    let mut tree = DomTree::new();
    let a = element_with(&mut tree, NodeId::ROOT, "p", &[("class", "x y"), ("id", "p1")]);
    assert!(parse(".x").is_match(&tree, a));
    assert!(parse(".y").is_match(&tree, a));
    assert!(!parse(".z").is_match(&tree, a));
    assert!(parse("#p1").is_match(&tree, a));
    assert!(parse("p.x#p1").is_match(&tree, a));
}

#[test]
fn test_attribute_operators() {
    let mut tree = DomTree::new();
    let a = element_with(
        &mut tree,
        NodeId::ROOT,
        "a",
        &[("href", "https://example.com/page.html"), ("rel", "nofollow external")],
    );
    assert!(parse("[href]").is_match(&tree, a));
    assert!(!parse("[title]").is_match(&tree, a));
    assert!(parse("[rel~=external]").is_match(&tree, a));
    assert!(!parse("[rel~=ext]").is_match(&tree, a));
    assert!(parse("[href^=https]").is_match(&tree, a));
    assert!(parse("[href$=\".html\"]").is_match(&tree, a));
    assert!(parse("[href*=example]").is_match(&tree, a));
    assert!(!parse("[href=example]").is_match(&tree, a));
}

#[test]
fn test_attribute_dash_match() {
    let mut tree = DomTree::new();
    let en = element_with(&mut tree, NodeId::ROOT, "p", &[("lang", "en")]);
    let en_us = element_with(&mut tree, NodeId::ROOT, "p", &[("lang", "en-US")]);
    let eng = element_with(&mut tree, NodeId::ROOT, "p", &[("lang", "eng")]);

    let selector = parse("[lang|=\"en\"]");
    assert!(selector.is_match(&tree, en));
    assert!(selector.is_match(&tree, en_us));
    assert!(!selector.is_match(&tree, eng));
}

#[test]
fn test_attribute_case_flags() {
    let mut tree = DomTree::new();
    let a = element_with(&mut tree, NodeId::ROOT, "input", &[("type", "TEXT")]);
    assert!(!parse("[type=text]").is_match(&tree, a));
    assert!(parse("[type=text i]").is_match(&tree, a));
    assert!(!parse("[type=text s]").is_match(&tree, a));
}

#[test]
fn test_descendant_and_child_matching() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body");
    let div = element(&mut tree, body, "div");
    let list = element(&mut tree, div, "ul");
    let item = element(&mut tree, list, "li");

    assert!(parse("div li").is_match(&tree, item));
    assert!(parse("body li").is_match(&tree, item));
    assert!(parse("ul > li").is_match(&tree, item));
    assert!(!parse("div > li").is_match(&tree, item));
    assert!(parse("body div ul li").is_match(&tree, item));
    assert!(!parse("span li").is_match(&tree, item));
}

#[test]
fn test_sibling_matching() {
    let mut tree = DomTree::new();
    let parent = element(&mut tree, NodeId::ROOT, "div");
    let h1 = element(&mut tree, parent, "h1");
    let p1 = element(&mut tree, parent, "p");
    let p2 = element(&mut tree, parent, "p");

    assert!(parse("h1 + p").is_match(&tree, p1));
    assert!(!parse("h1 + p").is_match(&tree, p2));
    assert!(parse("h1 ~ p").is_match(&tree, p2));
    assert!(!parse("p + h1").is_match(&tree, h1));
}

#[test]
fn test_structural_pseudo_classes() {
    let mut tree = DomTree::new();
    let list = element(&mut tree, NodeId::ROOT, "ul");
    let first = element(&mut tree, list, "li");
    let last = element(&mut tree, list, "li");
    let empty = element(&mut tree, NodeId::ROOT, "div");
    let full = element(&mut tree, NodeId::ROOT, "div");
    let text = tree.alloc(NodeKind::Text("words".to_string()));
    tree.append_child(full, text);

    assert!(parse("li:first-child").is_match(&tree, first));
    assert!(!parse("li:first-child").is_match(&tree, last));
    assert!(parse("li:last-child").is_match(&tree, last));
    assert!(parse("div:empty").is_match(&tree, empty));
    assert!(!parse("div:empty").is_match(&tree, full));
}

#[test]
fn test_state_pseudo_classes() {
    let mut tree = DomTree::new();
    let link = element_with(&mut tree, NodeId::ROOT, "a", &[("href", "/")]);
    let visited = element_with(&mut tree, NodeId::ROOT, "a", &[("href", "/x")]);
    if let Some(data) = tree.as_element_mut(visited) {
        let mut flags = data.style_flags();
        flags.insert(StyleFlags::VISITED);
        data.set_style_flags(flags);
    }
    let disabled = element_with(&mut tree, NodeId::ROOT, "input", &[("disabled", "")]);
    let enabled = element(&mut tree, NodeId::ROOT, "input");

    assert!(parse("a:link").is_match(&tree, link));
    assert!(!parse("a:link").is_match(&tree, visited));
    assert!(parse("a:visited").is_match(&tree, visited));
    assert!(parse("input:disabled").is_match(&tree, disabled));
    assert!(!parse("input:enabled").is_match(&tree, disabled));
    assert!(parse("input:enabled").is_match(&tree, enabled));
}

#[test]
fn test_is_and_not() {
    let mut tree = DomTree::new();
    let div = element_with(&mut tree, NodeId::ROOT, "div", &[("class", "a")]);
    let span = element_with(&mut tree, NodeId::ROOT, "span", &[("class", "a")]);

    assert!(parse(":is(div, p)").is_match(&tree, div));
    assert!(!parse(":is(div, p)").is_match(&tree, span));
    assert!(parse(":not(div)").is_match(&tree, span));
    assert!(!parse(":not(div)").is_match(&tree, div));
    assert!(parse(".a:not(span)").is_match(&tree, div));
}

#[test]
fn test_unknown_pseudo_never_matches() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div");
    assert!(!parse("div:nth-child(2)").is_match(&tree, div));
    assert!(!parse("div::before").is_match(&tree, div));
    // The rest of the compound still parses.
    assert!(parse("div, div:nth-child(2)").is_match(&tree, div));
}

#[test]
fn test_find_matches_scan_semantics() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body");
    let d1 = element_with(&mut tree, body, "div", &[("class", "foo")]);
    let d2 = element(&mut tree, body, "div");
    let s1 = element_with(&mut tree, d1, "span", &[("class", "foo")]);
    let _s2 = element(&mut tree, d2, "span");

    let compound = parse(".foo");
    let found = compound.find(&tree, body, None);
    assert_eq!(found.len(), 2);
    assert!(found.contains(&d1));
    assert!(found.contains(&s1));

    // find() is root-inclusive.
    let from_d1 = compound.find(&tree, d1, None);
    assert!(from_d1.contains(&d1));
    assert!(from_d1.contains(&s1));
    assert_eq!(from_d1.len(), 2);
}

#[test]
fn test_closest() {
    let mut tree = DomTree::new();
    let outer = element_with(&mut tree, NodeId::ROOT, "div", &[("class", "wrap")]);
    let inner = element(&mut tree, outer, "div");
    let leaf = element(&mut tree, inner, "span");

    let selector = &parse(".wrap").selectors[0];
    assert_eq!(selector.closest(&tree, leaf), Some(outer));
    assert_eq!(selector.closest(&tree, outer), Some(outer));
    let selector = &parse("span").selectors[0];
    assert_eq!(selector.closest(&tree, leaf), Some(leaf));
    let selector = &parse("table").selectors[0];
    assert_eq!(selector.closest(&tree, leaf), None);
}

#[test]
fn test_serialization_round_trips() {
    let cases = [
        "div",
        "*",
        ".cls",
        "#id",
        "div.cls#id",
        "[href]",
        "[lang|=en]",
        "[type=text i]",
        "div > p",
        "ul li + li",
        "h1 ~ p.note",
        "div, span.x",
        ":is(div, p)",
        ":not(.a)",
        "a:first-child:hover",
    ];
    for text in cases {
        let parsed = parse(text);
        let serialized = parsed.to_string();
        assert_eq!(serialized, text, "serialization of '{text}'");
        // And the serialized form parses back to the same model.
        assert_eq!(parse(&serialized), parsed);
    }
}

#[test]
fn test_quoted_attribute_serialization() {
    let parsed = parse("[data-x=\"two words\"]");
    assert_eq!(parsed.to_string(), "[data-x=\"two words\"]");
    assert_eq!(parse(&parsed.to_string()), parsed);
}
