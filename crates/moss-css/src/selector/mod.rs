//! CSS selector model and matching.
//!
//! [Selectors Level 3](https://www.w3.org/TR/selectors-3/)
//!
//! A [`CompoundSelector`] is a comma-separated list of [`Selector`]s; each
//! selector is a chain of [`SelectorComponent`]s (a combinator plus a
//! [`SimpleSelector`]); a simple selector is an element name plus an
//! ordered list of [`SelectorFilter`]s. Matching runs right-to-left: the
//! rightmost simple selector is tested against the candidate element, then
//! the chain is walked outward through the tree, backtracking where the
//! combinator allows more than one candidate (descendant, subsequent
//! sibling).

mod parser;
mod plan;
mod specificity;

pub use parser::parse_compound_selector;
pub use plan::{QueryPlan, plan_description};
pub use specificity::Specificity;

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use moss_dom::{DomTree, ElementData, LookupTables, NodeId, StyleFlags};

use crate::messages::{CssError, Messages};
use crate::tokenizer::Lexer;

/// Attribute comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr=value]` — exact match.
    Equals,
    /// `[attr~=value]` — whole whitespace-delimited word.
    Includes,
    /// `[attr|=value]` — exact or followed by `-`.
    DashMatch,
    /// `[attr^=value]` — prefix.
    Prefix,
    /// `[attr$=value]` — suffix.
    Suffix,
    /// `[attr*=value]` — substring.
    Substring,
}

/// How attribute values are compared.
///
/// Case sensitivity is an explicit, orthogonal field; it is never encoded
/// into the operator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Ordinal comparison (the default).
    #[default]
    Default,
    /// Explicitly case-sensitive (the `s` flag).
    Sensitive,
    /// ASCII-case-insensitive (the `i` flag).
    Insensitive,
}

/// One condition inside a simple selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorFilter {
    /// `.name`
    Class(String),
    /// `#id`
    Id(String),
    /// `[attr]`
    HasAttribute(String),
    /// `[attr <op> value <case>]`
    Attribute {
        /// The comparison operator.
        op: AttrOp,
        /// The attribute name (lowercase).
        name: String,
        /// The expected value.
        value: String,
        /// The comparison case mode.
        case: CaseMode,
    },
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:empty`
    Empty,
    /// `:link`
    Link,
    /// `:visited`
    Visited,
    /// `:hover`
    Hover,
    /// `:active`
    Active,
    /// `:focus`
    Focus,
    /// `:enabled`
    Enabled,
    /// `:disabled`
    Disabled,
    /// `:checked`
    Checked,
    /// `:indeterminate`
    Indeterminate,
    /// `:is(S)` — matches when `S` matches.
    Is(Box<CompoundSelector>),
    /// `:not(S)` — matches when `S` does not match.
    Not(Box<CompoundSelector>),
    /// A pseudo-class (or pseudo-element) this engine has no semantics
    /// for. Never matches.
    Unknown {
        /// The pseudo name, without colons.
        name: String,
        /// Raw argument text, for functional pseudos.
        argument: Option<String>,
    },
}

/// An element name plus its filters.
///
/// An empty `element_name` (or `*`) matches any element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleSelector {
    /// The lowercase element name; empty means universal.
    pub element_name: String,
    /// The filters, in source order.
    pub filters: Vec<SelectorFilter>,
}

impl SimpleSelector {
    /// A universal selector with no filters.
    #[must_use]
    pub fn universal() -> Self {
        Self::default()
    }

    /// True if the element name imposes no constraint.
    #[must_use]
    pub fn is_universal_name(&self) -> bool {
        self.element_name.is_empty() || self.element_name == "*"
    }

    /// Test this simple selector against one element.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        if !self.is_universal_name() && element.tag_name() != self.element_name {
            return false;
        }
        self.filters
            .iter()
            .all(|filter| filter_matches(filter, tree, node, element))
    }

    /// The first id filter, if any. The style manager indexes rules by it.
    #[must_use]
    pub fn id_filter(&self) -> Option<&str> {
        self.filters.iter().find_map(|f| match f {
            SelectorFilter::Id(id) => Some(id.as_str()),
            _ => None,
        })
    }

    /// All class filters. The style manager indexes rules by them.
    pub fn class_filters(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().filter_map(|f| match f {
            SelectorFilter::Class(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Attribute names this simple selector consults.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().filter_map(|f| match f {
            SelectorFilter::HasAttribute(name) => Some(name.as_str()),
            SelectorFilter::Attribute { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    fn specificity(&self) -> Specificity {
        let mut ids = 0;
        let mut classes = 0;
        let elements = u32::from(!self.is_universal_name());
        for filter in &self.filters {
            match filter {
                SelectorFilter::Id(_) => ids += 1,
                SelectorFilter::Class(_)
                | SelectorFilter::HasAttribute(_)
                | SelectorFilter::Attribute { .. }
                | SelectorFilter::FirstChild
                | SelectorFilter::LastChild
                | SelectorFilter::Empty
                | SelectorFilter::Link
                | SelectorFilter::Visited
                | SelectorFilter::Hover
                | SelectorFilter::Active
                | SelectorFilter::Focus
                | SelectorFilter::Enabled
                | SelectorFilter::Disabled
                | SelectorFilter::Checked
                | SelectorFilter::Indeterminate
                | SelectorFilter::Is(_)
                | SelectorFilter::Not(_)
                | SelectorFilter::Unknown { .. } => classes += 1,
            }
        }
        Specificity::from_counts(ids, classes, elements)
    }
}

/// The tree relationship between a simple selector and the one to its
/// right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// No relationship; the first component of every selector carries
    /// this, and matching restarts on the same node.
    #[default]
    None,
    /// Whitespace: any ancestor.
    Descendant,
    /// `>`: the parent.
    Child,
    /// `+`: the nearest preceding element sibling.
    NextSibling,
    /// `~`: any preceding element sibling.
    SubsequentSibling,
}

/// One link of a selector chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorComponent {
    /// How this component's element relates to the previous component's.
    pub combinator: Combinator,
    /// The simple selector tested at this position.
    pub simple: SimpleSelector,
}

/// A complete selector: a non-empty chain of components, left to right in
/// source order. The first component always carries [`Combinator::None`].
#[derive(Debug, Clone)]
pub struct Selector {
    components: Vec<SelectorComponent>,
    specificity: OnceLock<Specificity>,
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Selector {
    /// Build a selector from its components.
    ///
    /// # Panics
    /// Panics if `components` is empty; the parser never produces an empty
    /// chain.
    #[must_use]
    pub fn new(components: Vec<SelectorComponent>) -> Self {
        assert!(!components.is_empty(), "a selector needs at least one component");
        Self {
            components,
            specificity: OnceLock::new(),
        }
    }

    /// The component chain, in source order.
    #[must_use]
    pub fn components(&self) -> &[SelectorComponent] {
        &self.components
    }

    /// The rightmost (subject) simple selector.
    #[must_use]
    pub fn subject(&self) -> &SimpleSelector {
        &self
            .components
            .last()
            .expect("selector chains are non-empty")
            .simple
    }

    /// The selector's specificity, computed on first use and cached.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        *self.specificity.get_or_init(|| {
            self.components
                .iter()
                .fold(Specificity::ZERO, |sum, c| sum + c.simple.specificity())
        })
    }

    /// Test this selector against one element, walking the tree
    /// right-to-left.
    #[must_use]
    pub fn is_match(&self, tree: &DomTree, node: NodeId) -> bool {
        match_components(tree, &self.components, self.components.len() - 1, node)
    }

    /// All elements in the subtree rooted at `root` (inclusive) that this
    /// selector matches. Ordering is unspecified.
    ///
    /// With lookup tables the query planner picks an indexed starting set;
    /// without them the subtree is scanned.
    #[must_use]
    pub fn find(
        &self,
        tree: &DomTree,
        root: NodeId,
        tables: Option<&LookupTables>,
    ) -> HashSet<NodeId> {
        match tables {
            Some(tables) => plan::find_with_tables(self, tree, root, tables),
            None => self.find_by_scan(tree, root),
        }
    }

    /// Full-scan fallback for [`Selector::find`].
    #[must_use]
    pub fn find_by_scan(&self, tree: &DomTree, root: NodeId) -> HashSet<NodeId> {
        std::iter::once(root)
            .chain(tree.descendants(root))
            .filter(|&node| tree.as_element(node).is_some() && self.is_match(tree, node))
            .collect()
    }

    /// The nearest ancestor-or-self of `node` that matches.
    #[must_use]
    pub fn closest(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|&candidate| {
                tree.as_element(candidate).is_some() && self.is_match(tree, candidate)
            })
    }
}

/// A comma-separated selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    /// The member selectors, in source order.
    pub selectors: Vec<Selector>,
}

impl CompoundSelector {
    /// Parse selector text, collecting diagnostics into a fresh sink and
    /// failing if the text does not parse completely.
    pub fn parse(text: &str) -> Result<Self, CssError> {
        let messages = Messages::new();
        let mut lexer = Lexer::new(text, "<selector>", messages.clone());
        let parsed = parser::parse_compound_selector(&mut lexer);
        let trailing = lexer.next_non_space();
        match parsed {
            Some(compound) if trailing.is_eof() => Ok(compound),
            _ => {
                let details = messages
                    .entries()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(CssError::Selector {
                    selector: text.to_string(),
                    details: if details.is_empty() {
                        "unexpected trailing input".to_string()
                    } else {
                        details
                    },
                })
            }
        }
    }

    /// Parse selector text, `None` on any error.
    #[must_use]
    pub fn try_parse(text: &str) -> Option<Self> {
        Self::parse(text).ok()
    }

    /// The highest member specificity (members are compared
    /// lexicographically by their packed value).
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.selectors
            .iter()
            .map(Selector::specificity)
            .max()
            .unwrap_or(Specificity::ZERO)
    }

    /// True if any member matches `node`.
    #[must_use]
    pub fn is_match(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.is_match(tree, node))
    }

    /// The highest specificity among members that match `node`, or `None`
    /// if nothing matches.
    #[must_use]
    pub fn match_specificity(&self, tree: &DomTree, node: NodeId) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|s| s.is_match(tree, node))
            .map(Selector::specificity)
            .max()
    }

    /// Union of every member's [`Selector::find`].
    #[must_use]
    pub fn find(
        &self,
        tree: &DomTree,
        root: NodeId,
        tables: Option<&LookupTables>,
    ) -> HashSet<NodeId> {
        let mut result = HashSet::new();
        for selector in &self.selectors {
            result.extend(selector.find(tree, root, tables));
        }
        result
    }
}

/// Match the component chain ending at `index` against `node`.
fn match_components(
    tree: &DomTree,
    components: &[SelectorComponent],
    index: usize,
    node: NodeId,
) -> bool {
    if !components[index].simple.matches(tree, node) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match components[index].combinator {
        // Restart on the same node.
        Combinator::None => match_components(tree, components, index - 1, node),

        // Single-step: the parent must carry the rest of the chain.
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|parent| match_components(tree, components, index - 1, parent)),

        // Backtracking: any ancestor may carry the rest of the chain.
        Combinator::Descendant => tree
            .ancestors(node)
            .any(|ancestor| match_components(tree, components, index - 1, ancestor)),

        // Single-step: the nearest preceding element sibling.
        Combinator::NextSibling => tree
            .previous_element_sibling(node)
            .is_some_and(|sibling| match_components(tree, components, index - 1, sibling)),

        // Backtracking: any preceding element sibling.
        Combinator::SubsequentSibling => tree
            .preceding_siblings(node)
            .filter(|&s| tree.as_element(s).is_some())
            .any(|sibling| match_components(tree, components, index - 1, sibling)),
    }
}

fn filter_matches(
    filter: &SelectorFilter,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match filter {
        SelectorFilter::Class(name) => element.has_class(name),
        SelectorFilter::Id(id) => element.id() == id,
        SelectorFilter::HasAttribute(name) => element.has_attribute(name),
        SelectorFilter::Attribute {
            op,
            name,
            value,
            case,
        } => element
            .attribute(name)
            .is_some_and(|actual| attr_value_matches(*op, actual, value, *case)),

        SelectorFilter::FirstChild => tree
            .parent(node)
            .is_some_and(|parent| tree.first_element_child(parent) == Some(node)),
        SelectorFilter::LastChild => tree
            .parent(node)
            .is_some_and(|parent| tree.last_element_child(parent) == Some(node)),
        SelectorFilter::Empty => tree.children(node).all(|c| {
            tree.as_text(c).is_some_and(|t| t.trim().is_empty()) || tree.is_comment(c)
        }),

        // A link that has not been visited yet.
        SelectorFilter::Link => {
            element.has_attribute("href") && !element.style_flags().contains(StyleFlags::VISITED)
        }
        SelectorFilter::Visited => element.style_flags().contains(StyleFlags::VISITED),
        SelectorFilter::Hover => element.style_flags().contains(StyleFlags::HOVER),
        SelectorFilter::Active => element.style_flags().contains(StyleFlags::ACTIVE),
        SelectorFilter::Focus => element.style_flags().contains(StyleFlags::FOCUS),
        SelectorFilter::Disabled => {
            element.style_flags().contains(StyleFlags::DISABLED)
                || element.has_attribute("disabled")
        }
        SelectorFilter::Enabled => {
            !element.style_flags().contains(StyleFlags::DISABLED)
                && !element.has_attribute("disabled")
        }
        SelectorFilter::Checked => element.style_flags().contains(StyleFlags::CHECKED),
        SelectorFilter::Indeterminate => {
            element.style_flags().contains(StyleFlags::INDETERMINATE)
        }

        SelectorFilter::Is(inner) => inner.is_match(tree, node),
        SelectorFilter::Not(inner) => !inner.is_match(tree, node),

        SelectorFilter::Unknown { .. } => false,
    }
}

fn attr_value_matches(op: AttrOp, actual: &str, expected: &str, case: CaseMode) -> bool {
    let insensitive = case == CaseMode::Insensitive;
    let eq = |a: &str, b: &str| {
        if insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    };
    match op {
        AttrOp::Equals => eq(actual, expected),
        AttrOp::Includes => actual.split_ascii_whitespace().any(|word| eq(word, expected)),
        AttrOp::DashMatch => {
            if eq(actual, expected) {
                return true;
            }
            match actual.split_at_checked(expected.len()) {
                Some((head, tail)) => tail.starts_with('-') && eq(head, expected),
                None => false,
            }
        }
        AttrOp::Prefix | AttrOp::Suffix | AttrOp::Substring => {
            let (actual, expected) = if insensitive {
                (actual.to_ascii_lowercase(), expected.to_ascii_lowercase())
            } else {
                (actual.to_string(), expected.to_string())
            };
            match op {
                AttrOp::Prefix => actual.starts_with(&expected),
                AttrOp::Suffix => actual.ends_with(&expected),
                _ => actual.contains(&expected),
            }
        }
    }
}

// ── serialization ──────────────────────────────────────────────────────

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universal_name() {
            // A bare universal selector needs its `*`; with filters the
            // name is implied.
            if self.filters.is_empty() {
                write!(f, "*")?;
            }
        } else {
            write!(f, "{}", self.element_name)?;
        }
        for filter in &self.filters {
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::HasAttribute(name) => write!(f, "[{name}]"),
            Self::Attribute {
                op,
                name,
                value,
                case,
            } => {
                let op = match op {
                    AttrOp::Equals => "=",
                    AttrOp::Includes => "~=",
                    AttrOp::DashMatch => "|=",
                    AttrOp::Prefix => "^=",
                    AttrOp::Suffix => "$=",
                    AttrOp::Substring => "*=",
                };
                write!(f, "[{name}{op}")?;
                if is_plain_identifier(value) {
                    write!(f, "{value}")?;
                } else {
                    write!(f, "\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))?;
                }
                match case {
                    CaseMode::Default => {}
                    CaseMode::Sensitive => write!(f, " s")?,
                    CaseMode::Insensitive => write!(f, " i")?,
                }
                write!(f, "]")
            }
            Self::FirstChild => write!(f, ":first-child"),
            Self::LastChild => write!(f, ":last-child"),
            Self::Empty => write!(f, ":empty"),
            Self::Link => write!(f, ":link"),
            Self::Visited => write!(f, ":visited"),
            Self::Hover => write!(f, ":hover"),
            Self::Active => write!(f, ":active"),
            Self::Focus => write!(f, ":focus"),
            Self::Enabled => write!(f, ":enabled"),
            Self::Disabled => write!(f, ":disabled"),
            Self::Checked => write!(f, ":checked"),
            Self::Indeterminate => write!(f, ":indeterminate"),
            Self::Is(inner) => write!(f, ":is({inner})"),
            Self::Not(inner) => write!(f, ":not({inner})"),
            Self::Unknown { name, argument } => match argument {
                Some(argument) => write!(f, ":{name}({argument})"),
                None => write!(f, ":{name}"),
            },
        }
    }
}

/// True if `value` serializes as a bare identifier in an attribute
/// selector.
fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let is_start = |c: char| c.is_ascii_alphabetic() || c == '_' || !c.is_ascii();
    let is_part = |c: char| is_start(c) || c.is_ascii_digit() || c == '-';
    (is_start(first) || first == '-') && chars.all(is_part)
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.components {
            match component.combinator {
                Combinator::None => {}
                Combinator::Descendant => write!(f, " ")?,
                Combinator::Child => write!(f, " > ")?,
                Combinator::NextSibling => write!(f, " + ")?,
                Combinator::SubsequentSibling => write!(f, " ~ ")?,
            }
            write!(f, "{}", component.simple)?;
        }
        Ok(())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}
