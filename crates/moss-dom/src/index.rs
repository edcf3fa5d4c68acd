//! Host-maintained element indices.
//!
//! The CSS engine falls back to full-subtree scans when no tables are
//! supplied; with them, the query planner can start a `find()` from the
//! small side of the document. The tables also own a cache slot the planner
//! memoizes its plans (and their cost metrics) into, so plan lifetime
//! follows the document shape the plans were costed against.

use std::any::Any;
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use moss_util::LruCache;

use crate::{DomTree, NodeId};

/// Bound on memoized query plans per document.
const PLAN_CACHE_LIMIT: usize = 256;

/// The five indices of the lookup-table contract, plus the plan-cache slot.
///
/// The host decides when to rebuild; [`LookupTables::build`] scans the whole
/// tree, which is enough for embedders whose documents change rarely.
pub struct LookupTables {
    by_element_type: HashMap<String, Vec<NodeId>>,
    by_id: HashMap<String, Vec<NodeId>>,
    by_class: HashMap<String, Vec<NodeId>>,
    by_name: HashMap<String, Vec<NodeId>>,
    by_type_attribute: HashMap<String, Vec<NodeId>>,
    plan_cache: RefCell<LruCache<String, Rc<dyn Any>>>,
}

impl LookupTables {
    /// Build all five indices by scanning `tree`.
    #[must_use]
    pub fn build(tree: &DomTree) -> Self {
        let mut tables = Self {
            by_element_type: HashMap::new(),
            by_id: HashMap::new(),
            by_class: HashMap::new(),
            by_name: HashMap::new(),
            by_type_attribute: HashMap::new(),
            plan_cache: RefCell::new(LruCache::new(PLAN_CACHE_LIMIT)),
        };
        for id in tree.descendants(tree.root()) {
            let Some(element) = tree.as_element(id) else {
                continue;
            };
            tables
                .by_element_type
                .entry(element.tag_name().to_string())
                .or_default()
                .push(id);
            if !element.id().is_empty() {
                tables
                    .by_id
                    .entry(element.id().to_string())
                    .or_default()
                    .push(id);
            }
            for class in element.class_names() {
                tables.by_class.entry(class.clone()).or_default().push(id);
            }
            if let Some(name) = element.attribute("name") {
                tables.by_name.entry(name.to_string()).or_default().push(id);
            }
            if let Some(ty) = element.attribute("type") {
                tables
                    .by_type_attribute
                    .entry(ty.to_string())
                    .or_default()
                    .push(id);
            }
        }
        tables
    }

    /// Elements whose tag name is `name` (lowercase).
    #[must_use]
    pub fn elements_by_element_type(&self, name: &str) -> &[NodeId] {
        self.by_element_type.get(name).map_or(&[], Vec::as_slice)
    }

    /// Elements whose id is `id`.
    #[must_use]
    pub fn elements_by_id(&self, id: &str) -> &[NodeId] {
        self.by_id.get(id).map_or(&[], Vec::as_slice)
    }

    /// Elements carrying class `class`.
    #[must_use]
    pub fn elements_by_class(&self, class: &str) -> &[NodeId] {
        self.by_class.get(class).map_or(&[], Vec::as_slice)
    }

    /// Elements whose `name` attribute is `name`.
    #[must_use]
    pub fn elements_by_name(&self, name: &str) -> &[NodeId] {
        self.by_name.get(name).map_or(&[], Vec::as_slice)
    }

    /// Elements whose `type` attribute is `value`.
    #[must_use]
    pub fn elements_by_type_attribute(&self, value: &str) -> &[NodeId] {
        self.by_type_attribute.get(value).map_or(&[], Vec::as_slice)
    }

    /// The plan-cache slot. Values are opaque to this crate; the query
    /// planner stores its memoized plans here keyed by selector text.
    pub fn plan_cache(&self) -> RefMut<'_, LruCache<String, Rc<dyn Any>>> {
        self.plan_cache.borrow_mut()
    }
}
