//! Cost-based query planning for `find()`.
//!
//! Given a selector and the host's lookup tables, the planner picks the
//! cheapest starting set (scan, by element type, by id, by class, by
//! `[name=…]`, by `[type=…]`) and traversal mode (self, children,
//! descendants) for enumerating candidate elements, then confirms each
//! candidate with a full right-to-left match.
//!
//! Only positions whose right-hand combinator chain consists of child and
//! descendant steps can anchor a plan; sibling combinators are hard to
//! index and keep the subject as the anchor.
//!
//! Plans are memoized in the lookup tables' cache slot, keyed by the
//! selector's serialization. After each execution the measured cost is
//! compared against the estimate; a deviation beyond a 3:2 ratio (either
//! way) invalidates the cached plan so the next query re-plans against the
//! changed document shape. The same ratio between the result size and the
//! measured cost invalidates the outer plan as well.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use moss_dom::{DomTree, LookupTables, NodeId};

use super::{AttrOp, Combinator, Selector, SelectorFilter, SimpleSelector};

/// Invalidation threshold: measured/expected beyond 3:2 either way.
const DEVIATION_RATIO: f64 = 1.5;

/// Where a plan's candidate enumeration starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Scan every element under the query root.
    Scan,
    /// The by-element-name index.
    ElementType(String),
    /// The by-id index.
    Id(String),
    /// The by-class index.
    Class(String),
    /// The `[name=…]` index.
    NameAttribute(String),
    /// The `[type=…]` index.
    TypeAttribute(String),
}

impl fmt::Display for SourceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => write!(f, "*"),
            Self::ElementType(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::NameAttribute(value) => write!(f, "[name={value}]"),
            Self::TypeAttribute(value) => write!(f, "[type={value}]"),
        }
    }
}

/// How candidates are enumerated from each source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    /// The source element itself is the candidate.
    SelfNode,
    /// Its child elements are the candidates.
    Children,
    /// Its descendant elements are the candidates.
    Descendants,
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfNode => write!(f, "match self"),
            Self::Children => write!(f, "scan children"),
            Self::Descendants => write!(f, "scan descendants"),
        }
    }
}

/// A planned strategy for one selector, with its cost metrics.
#[derive(Debug)]
pub struct QueryPlan {
    source: SourceStrategy,
    traversal: TraversalMode,
    estimated_cost: f64,
    /// Nodes visited during the most recent execution; 0 before any run.
    actual_cost: Cell<f64>,
}

impl QueryPlan {
    /// The chosen source strategy.
    #[must_use]
    pub fn source(&self) -> &SourceStrategy {
        &self.source
    }

    /// The chosen traversal mode.
    #[must_use]
    pub fn traversal(&self) -> TraversalMode {
        self.traversal
    }

    /// The planner's cost estimate.
    #[must_use]
    pub fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    /// The cost measured by the most recent execution.
    #[must_use]
    pub fn actual_cost(&self) -> f64 {
        self.actual_cost.get()
    }

    /// Human-readable form, e.g. `Start at '#x', scan descendants`.
    #[must_use]
    pub fn description(&self) -> String {
        format!("Start at '{}', {}", self.source, self.traversal)
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Plan (or fetch the memoized plan for) `selector` and run it.
pub fn find_with_tables(
    selector: &Selector,
    tree: &DomTree,
    root: NodeId,
    tables: &LookupTables,
) -> HashSet<NodeId> {
    let plan = cached_plan(selector, tree, root, tables);
    let (result, visited) = execute(&plan, selector, tree, root, tables);
    let visited = visited as f64;
    plan.actual_cost.set(visited);

    let estimate_drifted = deviates(plan.estimated_cost, visited);
    let result_drifted = deviates(result.len() as f64, visited);
    if estimate_drifted || result_drifted {
        let _ = tables.plan_cache().remove(&selector.to_string());
    }
    result
}

/// The memoized plan's description, planning if not yet cached. Test and
/// diagnostics hook.
#[must_use]
pub fn plan_description(
    selector: &Selector,
    tree: &DomTree,
    root: NodeId,
    tables: &LookupTables,
) -> String {
    cached_plan(selector, tree, root, tables).description()
}

fn cached_plan(
    selector: &Selector,
    tree: &DomTree,
    root: NodeId,
    tables: &LookupTables,
) -> Rc<QueryPlan> {
    let key = selector.to_string();
    {
        let mut cache = tables.plan_cache();
        if let Some(hit) = cache.get(&key) {
            if let Ok(plan) = Rc::clone(hit).downcast::<QueryPlan>() {
                return plan;
            }
        }
    }
    let plan = Rc::new(build_plan(selector, tree, root, tables));
    tables
        .plan_cache()
        .put(key, Rc::clone(&plan) as Rc<dyn Any>);
    plan
}

/// Walk the selector right-to-left and keep the globally cheapest
/// (source, traversal) pair.
fn build_plan(
    selector: &Selector,
    tree: &DomTree,
    root: NodeId,
    tables: &LookupTables,
) -> QueryPlan {
    let components = selector.components();
    let scan_cost = (tree.descendant_element_count(root) + 1) as f64;

    // The always-available fallback: scan the subtree and self-match.
    let mut best = QueryPlan {
        source: SourceStrategy::Scan,
        traversal: TraversalMode::SelfNode,
        estimated_cost: scan_cost * 2.0,
        actual_cost: Cell::new(0.0),
    };

    for index in (0..components.len()).rev() {
        let Some(traversal) = traversal_for_anchor(components, index) else {
            continue;
        };
        for source in source_strategies(&components[index].simple) {
            let source_set = source_elements(&source, tables);
            let source_cost = source_set.len() as f64;
            let traversal_cost = match traversal {
                TraversalMode::SelfNode => source_cost,
                TraversalMode::Children => source_set
                    .iter()
                    .map(|&e| tree.child_element_count(e))
                    .sum::<usize>() as f64,
                TraversalMode::Descendants => source_set
                    .iter()
                    .map(|&e| tree.descendant_element_count(e))
                    .sum::<usize>() as f64,
            };
            let total = source_cost + traversal_cost;
            if total < best.estimated_cost {
                best = QueryPlan {
                    source,
                    traversal,
                    estimated_cost: total,
                    actual_cost: Cell::new(0.0),
                };
            }
        }
    }
    best
}

/// The traversal mode for anchoring at `index`, or `None` when a sibling
/// combinator to the right makes the position unusable.
fn traversal_for_anchor(
    components: &[super::SelectorComponent],
    index: usize,
) -> Option<TraversalMode> {
    let right = &components[index + 1..];
    if right
        .iter()
        .any(|c| matches!(c.combinator, Combinator::NextSibling | Combinator::SubsequentSibling))
    {
        return None;
    }
    Some(match right {
        [] => TraversalMode::SelfNode,
        [only] if only.combinator == Combinator::Child => TraversalMode::Children,
        _ => TraversalMode::Descendants,
    })
}

/// The indexable keys a simple selector offers.
fn source_strategies(simple: &SimpleSelector) -> Vec<SourceStrategy> {
    let mut strategies = Vec::new();
    if let Some(id) = simple.id_filter() {
        strategies.push(SourceStrategy::Id(id.to_string()));
    }
    for class in simple.class_filters() {
        strategies.push(SourceStrategy::Class(class.to_string()));
    }
    for filter in &simple.filters {
        if let SelectorFilter::Attribute {
            op: AttrOp::Equals,
            name,
            value,
            ..
        } = filter
        {
            match name.as_str() {
                "name" => strategies.push(SourceStrategy::NameAttribute(value.clone())),
                "type" => strategies.push(SourceStrategy::TypeAttribute(value.clone())),
                _ => {}
            }
        }
    }
    if !simple.is_universal_name() {
        strategies.push(SourceStrategy::ElementType(simple.element_name.clone()));
    }
    strategies
}

fn source_elements(source: &SourceStrategy, tables: &LookupTables) -> Vec<NodeId> {
    match source {
        SourceStrategy::Scan => Vec::new(),
        SourceStrategy::ElementType(name) => tables.elements_by_element_type(name).to_vec(),
        SourceStrategy::Id(id) => tables.elements_by_id(id).to_vec(),
        SourceStrategy::Class(class) => tables.elements_by_class(class).to_vec(),
        SourceStrategy::NameAttribute(value) => tables.elements_by_name(value).to_vec(),
        SourceStrategy::TypeAttribute(value) => tables.elements_by_type_attribute(value).to_vec(),
    }
}

/// Run the plan: enumerate candidates, confirm with a full match, count
/// visited nodes.
fn execute(
    plan: &QueryPlan,
    selector: &Selector,
    tree: &DomTree,
    root: NodeId,
    tables: &LookupTables,
) -> (HashSet<NodeId>, usize) {
    let mut result = HashSet::new();
    let mut visited = 0usize;

    let mut consider = |node: NodeId, visited: &mut usize, result: &mut HashSet<NodeId>| {
        *visited += 1;
        if tree.as_element(node).is_some()
            && in_subtree(tree, node, root)
            && selector.is_match(tree, node)
        {
            let _ = result.insert(node);
        }
    };

    match plan.source {
        SourceStrategy::Scan => {
            consider(root, &mut visited, &mut result);
            for node in tree.descendants(root) {
                consider(node, &mut visited, &mut result);
            }
        }
        _ => {
            for &element in &source_elements(&plan.source, tables) {
                match plan.traversal {
                    TraversalMode::SelfNode => consider(element, &mut visited, &mut result),
                    TraversalMode::Children => {
                        for child in tree.children(element) {
                            consider(child, &mut visited, &mut result);
                        }
                    }
                    TraversalMode::Descendants => {
                        for node in tree.descendants(element) {
                            consider(node, &mut visited, &mut result);
                        }
                    }
                }
            }
        }
    }
    (result, visited)
}

fn in_subtree(tree: &DomTree, node: NodeId, root: NodeId) -> bool {
    node == root || tree.is_descendant_of(node, root)
}

fn deviates(expected: f64, measured: f64) -> bool {
    if expected <= 0.0 || measured <= 0.0 {
        return false;
    }
    measured > expected * DEVIATION_RATIO || measured * DEVIATION_RATIO < expected
}
