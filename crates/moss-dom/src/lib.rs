//! Arena element tree consumed by the moss CSS engine.
//!
//! The engine core does not parse HTML or mutate documents; it consumes a
//! host tree through the capability set implemented here: lowercase tag and
//! attribute names, id and class access, style flags for the interactive
//! pseudo-classes, tree linkage, and the element counts the query planner
//! costs its traversals with.
//!
//! # Design
//!
//! Nodes live in a single arena addressed by [`NodeId`]. Tree shape is
//! encoded entirely in per-node links (`parent`, `first_child`,
//! `last_child`, `prev_sibling`, `next_sibling`): there is no per-node
//! child vector, so appending a child is O(1) pointer surgery and every
//! traversal the selector engine needs (children, ancestors, preceding
//! siblings, document-order descendants) is a lazy walk over the links.

use std::collections::HashMap;
use std::iter;

use serde::Serialize;

/// Host-maintained element indices for fast selector queries.
pub mod index;

pub use index::LookupTables;

/// A type-safe index into the element tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing
/// issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Interactive state bits consulted by the selector engine.
///
/// The `:link` pseudo-class is derived (an element with an `href` and no
/// [`StyleFlags::VISITED`] bit), so it has no bit of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StyleFlags(u16);

impl StyleFlags {
    /// The element's link target has been visited.
    pub const VISITED: Self = Self(1 << 0);
    /// The pointer is over the element.
    pub const HOVER: Self = Self(1 << 1);
    /// The element is being activated.
    pub const ACTIVE: Self = Self(1 << 2);
    /// The element has input focus.
    pub const FOCUS: Self = Self(1 << 3);
    /// The element is disabled.
    pub const DISABLED: Self = Self(1 << 4);
    /// The element is checked.
    pub const CHECKED: Self = Self(1 << 5);
    /// The element's checked state is indeterminate.
    pub const INDETERMINATE: Self = Self(1 << 6);

    /// True if every bit of `flags` is set on `self`.
    #[must_use]
    pub fn contains(self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// Set the bits of `flags`.
    pub fn insert(&mut self, flags: Self) {
        self.0 |= flags.0;
    }

    /// Clear the bits of `flags`.
    pub fn remove(&mut self, flags: Self) {
        self.0 &= !flags.0;
    }
}

/// The payload of a tree node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document root.
    Document,
    /// An element with a tag name, attributes, and style flags.
    Element(ElementData),
    /// A text run.
    Text(String),
    /// A comment; invisible to selectors except `:empty`.
    Comment(String),
}

/// Element-specific data.
///
/// Tag and attribute names are lowercased on construction and insertion, so
/// selector matching can compare ordinally. The `id` attribute and the
/// class list are mirrored out of the attribute map because the engine
/// consults them on every candidate-rule lookup.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    tag_name: String,
    id: String,
    classes: Vec<String>,
    attrs: HashMap<String, String>,
    style_flags: StyleFlags,
}

impl ElementData {
    /// Create element data for `tag_name` (lowercased).
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// The lowercase tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// The element id; empty if absent.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The class names, in source order.
    #[must_use]
    pub fn class_names(&self) -> &[String] {
        &self.classes
    }

    /// True if the class list contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    /// Add `name` to the class list if not already present.
    pub fn add_class(&mut self, name: &str) {
        if !self.has_class(name) {
            self.classes.push(name.to_string());
            self.sync_class_attribute();
        }
    }

    /// Remove `name` from the class list.
    pub fn remove_class(&mut self, name: &str) {
        let before = self.classes.len();
        self.classes.retain(|c| c != name);
        if self.classes.len() != before {
            self.sync_class_attribute();
        }
    }

    /// The value of attribute `name` (lowercase lookup), if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// True if attribute `name` is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Set attribute `name` (lowercased) to `value`.
    ///
    /// `id` and `class` are mirrored into their dedicated fields.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id = value.to_string(),
            "class" => {
                self.classes = value.split_ascii_whitespace().map(str::to_string).collect();
            }
            _ => {}
        }
        let _ = self.attrs.insert(name, value.to_string());
    }

    /// The interactive state bits.
    #[must_use]
    pub fn style_flags(&self) -> StyleFlags {
        self.style_flags
    }

    /// Replace the interactive state bits.
    pub fn set_style_flags(&mut self, flags: StyleFlags) {
        self.style_flags = flags;
    }

    fn sync_class_attribute(&mut self) {
        let joined = self.classes.join(" ");
        let _ = self.attrs.insert("class".to_string(), joined);
    }
}

/// A node in the arena: its payload plus the five structure links.
///
/// The links are private; tree shape is read and mutated through
/// [`DomTree`] so they can never fall out of sync.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node payload.
    pub kind: NodeKind,
    links: Links,
}

/// The five pointers that encode the tree shape.
#[derive(Debug, Clone, Copy, Default)]
struct Links {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    fn detached(kind: NodeKind) -> Self {
        Self {
            kind,
            links: Links::default(),
        }
    }
}

/// Arena-based element tree with O(1) node access and O(1) append.
///
/// All shape queries are link walks; none of them allocate.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding just the document node.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let root = tree.alloc(NodeKind::Document);
        debug_assert_eq!(root, NodeId::ROOT);
        tree
    }

    /// The root document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena (including the document node).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its id.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(kind));
        id
    }

    /// Allocate an element node for `tag_name`.
    pub fn alloc_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag_name)))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Pure pointer surgery: swing the parent's `last_child` onto the new
    /// node and stitch the sibling links between it and the previous tail
    /// (or set `first_child` when the parent was childless).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].links.parent.is_none(),
            "node is already attached"
        );
        let displaced_tail = self.nodes[parent.0].links.last_child.replace(child);
        let child_links = &mut self.nodes[child.0].links;
        child_links.parent = Some(parent);
        child_links.prev_sibling = displaced_tail;
        match displaced_tail {
            Some(tail) => self.nodes[tail.0].links.next_sibling = Some(child),
            None => self.nodes[parent.0].links.first_child = Some(child),
        }
    }

    fn links(&self, id: NodeId) -> Links {
        self.get(id).map(|n| n.links).unwrap_or_default()
    }

    /// The parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.links(id).parent
    }

    /// The first child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.links(id).first_child
    }

    /// The last child of `id`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.links(id).last_child
    }

    /// The next sibling of `id`.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.links(id).next_sibling
    }

    /// The previous sibling of `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.links(id).prev_sibling
    }

    /// The children of `id`, in order: a lazy walk of the sibling chain
    /// starting at `first_child`.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.first_child(id), move |&c| self.next_sibling(c))
    }

    /// The ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.parent(id), move |&a| self.parent(a))
    }

    /// The preceding siblings of `id`, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.prev_sibling(id), move |&s| self.prev_sibling(s))
    }

    /// All descendants of `id` in document order (depth-first,
    /// pre-order), excluding `id` itself.
    ///
    /// The walk keeps no stack: from each node it steps to the first
    /// child, else the next sibling, else climbs toward `id` looking for
    /// an unvisited sibling.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.first_child(id), move |&current| {
            self.next_in_subtree(current, id)
        })
    }

    /// The node after `node` in the document order of `scope`'s subtree.
    fn next_in_subtree(&self, node: NodeId, scope: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(node) {
            return Some(child);
        }
        let mut cursor = node;
        while cursor != scope {
            if let Some(sibling) = self.next_sibling(cursor) {
                return Some(sibling);
            }
            cursor = self.parent(cursor)?;
        }
        None
    }

    /// Position of `id` among its parent's children, or 0 if detached.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> usize {
        self.preceding_siblings(id).count()
    }

    /// The nearest preceding sibling that is an element.
    #[must_use]
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.preceding_siblings(id)
            .find(|&sibling| self.as_element(sibling).is_some())
    }

    /// The first child of `id` that is an element.
    #[must_use]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).find(|&c| self.as_element(c).is_some())
    }

    /// The last child of `id` that is an element: a backward walk from
    /// `last_child`.
    #[must_use]
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        iter::successors(self.last_child(id), |&c| self.prev_sibling(c))
            .find(|&c| self.as_element(c).is_some())
    }

    /// True if `descendant` sits somewhere below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|a| a == ancestor)
    }

    /// Number of child nodes of `id` that are elements.
    ///
    /// Used by the query planner to cost `children` traversals.
    #[must_use]
    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.children(id)
            .filter(|&c| self.as_element(c).is_some())
            .count()
    }

    /// Number of descendant nodes of `id` that are elements.
    ///
    /// Used by the query planner to cost `descendants` traversals.
    #[must_use]
    pub fn descendant_element_count(&self, id: NodeId) -> usize {
        self.descendants(id)
            .filter(|&d| self.as_element(d).is_some())
            .count()
    }

    /// Element data for `id`, if it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable element data for `id`, if it is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Text content for `id`, if it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// True if `id` is a comment node.
    #[must_use]
    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.get(id).map(|n| &n.kind), Some(NodeKind::Comment(_)))
    }

    /// The first element child of the document node.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(NodeId::ROOT)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_stitches_sibling_links() {
        let mut tree = DomTree::new();
        let parent = tree.alloc_element("ul");
        tree.append_child(NodeId::ROOT, parent);
        let a = tree.alloc_element("li");
        let b = tree.alloc_element("li");
        tree.append_child(parent, a);
        tree.append_child(parent, b);

        assert_eq!(tree.first_child(parent), Some(a));
        assert_eq!(tree.last_child(parent), Some(b));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.next_sibling(b), None);
    }

    #[test]
    fn descendant_walk_climbs_back_out() {
        // body > (div > span), p — after span the walk must climb to p,
        // and must stop at the subtree scope.
        let mut tree = DomTree::new();
        let body = tree.alloc_element("body");
        let div = tree.alloc_element("div");
        let span = tree.alloc_element("span");
        let p = tree.alloc_element("p");
        tree.append_child(NodeId::ROOT, body);
        tree.append_child(body, div);
        tree.append_child(div, span);
        tree.append_child(body, p);

        let all: Vec<NodeId> = tree.descendants(body).collect();
        assert_eq!(all, vec![div, span, p]);
        let scoped: Vec<NodeId> = tree.descendants(div).collect();
        assert_eq!(scoped, vec![span]);
    }
}
