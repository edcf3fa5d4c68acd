//! The style manager: rule indices and the cascade.
//!
//! The manager owns a mutable set of stylesheets and keeps fast indices
//! over them, keyed by each selector's rightmost simple selector (id,
//! class, element name, or the generic bucket). For an element it
//! produces the candidate rules from the indices, confirms them with a
//! real match, and cascades the surviving declarations into a
//! [`ComputedStyle`].

use std::collections::HashMap;
use std::sync::Arc;

use moss_dom::{DomTree, NodeId};

use crate::messages::Messages;
use crate::parser::{StyleRule, Stylesheet};
use crate::property::{PropertyFlags, PropertyId, StyleProperty};
use crate::selector::Specificity;
use crate::style::ComputedStyle;

/// A reference into the managed stylesheet set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RuleRef {
    sheet: usize,
    rule: usize,
}

/// One rule that matched an element, with its winning specificity.
#[derive(Debug, Clone)]
pub struct MatchedRule {
    /// The stylesheet the rule came from.
    pub sheet: Arc<Stylesheet>,
    /// Index of the rule within its sheet.
    pub rule_index: usize,
    /// The highest specificity among the selector-list members that
    /// matched, including the source-order tie-break bits.
    pub specificity: Specificity,
}

impl MatchedRule {
    /// The matched rule itself.
    #[must_use]
    pub fn rule(&self) -> &StyleRule {
        &self.sheet.rules()[self.rule_index]
    }
}

/// Owns stylesheets, indexes their rules, and computes element styles.
///
/// The manager itself is not synchronized; wrap it if it must be shared
/// across threads.
pub struct StyleManager {
    messages: Messages,
    sheets: Vec<Arc<Stylesheet>>,
    by_element_name: HashMap<String, Vec<RuleRef>>,
    by_class: HashMap<String, Vec<RuleRef>>,
    by_id: HashMap<String, Vec<RuleRef>>,
    generic_rules: Vec<RuleRef>,
    attributes_used: HashMap<String, usize>,
    classnames_used: HashMap<String, usize>,
    listeners: Vec<Box<dyn Fn()>>,
}

impl StyleManager {
    /// An empty manager with a lenient diagnostics sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_messages(Messages::new())
    }

    /// An empty manager reporting into `messages`.
    #[must_use]
    pub fn with_messages(messages: Messages) -> Self {
        Self {
            messages,
            sheets: Vec::new(),
            by_element_name: HashMap::new(),
            by_class: HashMap::new(),
            by_id: HashMap::new(),
            generic_rules: Vec::new(),
            attributes_used: HashMap::new(),
            classnames_used: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    /// The diagnostics collected by this manager's parses.
    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// The managed stylesheets, in insertion order.
    #[must_use]
    pub fn stylesheets(&self) -> &[Arc<Stylesheet>] {
        &self.sheets
    }

    /// Register a callback fired whenever the stylesheet set changes.
    pub fn on_stylesheets_changed(&mut self, listener: Box<dyn Fn()>) {
        self.listeners.push(listener);
    }

    /// Parse `text` and add it to the managed set.
    pub fn add_stylesheet(&mut self, text: &str, filename: &str) -> Arc<Stylesheet> {
        let sheet = Arc::new(Stylesheet::parse(text, filename, &self.messages));
        self.add_stylesheet_parsed(Arc::clone(&sheet));
        sheet
    }

    /// Add an already parsed stylesheet to the managed set.
    pub fn add_stylesheet_parsed(&mut self, sheet: Arc<Stylesheet>) {
        let index = self.sheets.len();
        self.sheets.push(sheet);
        self.index_sheet(index);
        self.notify_changed();
    }

    /// Remove `sheet` from the managed set; true if it was present.
    pub fn remove_stylesheet(&mut self, sheet: &Arc<Stylesheet>) -> bool {
        let before = self.sheets.len();
        self.sheets.retain(|s| !Arc::ptr_eq(s, sheet));
        if self.sheets.len() == before {
            return false;
        }
        self.rebuild_indices();
        self.notify_changed();
        true
    }

    /// How many indexed selectors consult attribute `name`. Hosts use
    /// this to decide whether an attribute mutation can invalidate
    /// style.
    #[must_use]
    pub fn attributes_used_by_styles(&self, name: &str) -> usize {
        self.attributes_used.get(name).copied().unwrap_or(0)
    }

    /// How many indexed selectors consult class `name`.
    #[must_use]
    pub fn classnames_used_by_styles(&self, name: &str) -> usize {
        self.classnames_used.get(name).copied().unwrap_or(0)
    }

    /// The rules that actually match `element`, each with its winning
    /// specificity. Order is unspecified; the cascade does not depend on
    /// it.
    #[must_use]
    pub fn get_style_rules(&self, tree: &DomTree, element: NodeId) -> Vec<MatchedRule> {
        let Some(data) = tree.as_element(element) else {
            return Vec::new();
        };

        // Candidate superset from the indices.
        let mut candidates: Vec<RuleRef> = Vec::new();
        candidates.extend_from_slice(&self.generic_rules);
        if let Some(rules) = self.by_element_name.get(data.tag_name()) {
            candidates.extend_from_slice(rules);
        }
        if !data.id().is_empty() {
            if let Some(rules) = self.by_id.get(data.id()) {
                candidates.extend_from_slice(rules);
            }
        }
        for class in data.class_names() {
            if let Some(rules) = self.by_class.get(class.as_str()) {
                candidates.extend_from_slice(rules);
            }
        }
        candidates.sort_unstable_by_key(|r| (r.sheet, r.rule));
        candidates.dedup();

        // Confirm with a real match.
        let mut matched = Vec::new();
        for candidate in candidates {
            let sheet = &self.sheets[candidate.sheet];
            let rule = &sheet.rules()[candidate.rule];
            if let Some(specificity) = rule.selector.match_specificity(tree, element) {
                matched.push(MatchedRule {
                    sheet: Arc::clone(sheet),
                    rule_index: candidate.rule,
                    specificity: specificity
                        .with_source_order(candidate.sheet as u32, candidate.rule as u32),
                });
            }
        }
        matched
    }

    /// Cascade the matching rules into a computed style.
    ///
    /// Starts from `make_child(parent)` (or the default style at the
    /// root), applies each winning longhand, and honors the CSS-wide
    /// flags: `initial` copies from the default, `inherit` from the
    /// parent, `unset` leaves the start value in place.
    #[must_use]
    pub fn compute_style(
        &self,
        tree: &DomTree,
        element: NodeId,
        parent: Option<&ComputedStyle>,
    ) -> ComputedStyle {
        let matched = self.get_style_rules(tree, element);
        let winners = extract_most_specific(&matched);

        let default = ComputedStyle::default_ref();
        let mut style = match parent {
            Some(parent) => ComputedStyle::make_child(parent),
            None => default.clone(),
        };

        for (property, _) in winners.into_values() {
            let flags = property.flags;
            if flags.unset {
                continue;
            }
            if flags.initial {
                style = property.copy_property(&style, default);
            } else if flags.inherit {
                style = property.copy_property(&style, parent.unwrap_or(default));
            } else {
                style = property.apply(&style);
            }
        }
        style
    }

    // ── indexing ────────────────────────────────────────────────────────

    fn rebuild_indices(&mut self) {
        self.by_element_name.clear();
        self.by_class.clear();
        self.by_id.clear();
        self.generic_rules.clear();
        self.attributes_used.clear();
        self.classnames_used.clear();
        for index in 0..self.sheets.len() {
            self.index_sheet(index);
        }
    }

    fn index_sheet(&mut self, sheet_index: usize) {
        let sheet = Arc::clone(&self.sheets[sheet_index]);
        for (rule_index, rule) in sheet.rules().iter().enumerate() {
            let rule_ref = RuleRef {
                sheet: sheet_index,
                rule: rule_index,
            };
            self.index_rule(rule, rule_ref);
        }
    }

    /// File each selector-list member under its rightmost simple
    /// selector's most selective key, and refcount the attribute and
    /// class names the whole rule consults.
    fn index_rule(&mut self, rule: &StyleRule, rule_ref: RuleRef) {
        for selector in &rule.selector.selectors {
            let subject = selector.subject();
            if let Some(id) = subject.id_filter() {
                self.by_id.entry(id.to_string()).or_default().push(rule_ref);
            } else {
                let classes: Vec<&str> = subject.class_filters().collect();
                if !classes.is_empty() {
                    for class in classes {
                        self.by_class
                            .entry(class.to_string())
                            .or_default()
                            .push(rule_ref);
                    }
                } else if !subject.is_universal_name() {
                    self.by_element_name
                        .entry(subject.element_name.clone())
                        .or_default()
                        .push(rule_ref);
                } else {
                    self.generic_rules.push(rule_ref);
                }
            }

            for component in selector.components() {
                for name in component.simple.attribute_names() {
                    *self.attributes_used.entry(name.to_string()).or_insert(0) += 1;
                }
                for class in component.simple.class_filters() {
                    *self.classnames_used.entry(class.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    fn notify_changed(&self) {
        for listener in &self.listeners {
            listener();
        }
    }
}

impl Default for StyleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// The cascade reduction: decompose every matched declaration into
/// longhands, then keep one winner per longhand.
///
/// `!important` beats any specificity; otherwise the packed specificity
/// decides, and its low bits already encode source order. A later
/// declaration in the same rule replaces an earlier equal one.
fn extract_most_specific(
    matched: &[MatchedRule],
) -> HashMap<PropertyId, (StyleProperty, CascadeRank)> {
    let mut winners: HashMap<PropertyId, (StyleProperty, CascadeRank)> = HashMap::new();
    for entry in matched {
        for property in entry.rule().properties.iter() {
            for longhand in property.decompose() {
                if longhand.id == PropertyId::Unknown || !longhand.flags.valid {
                    continue;
                }
                let rank = CascadeRank::new(&longhand.flags, entry.specificity);
                match winners.get(&longhand.id) {
                    Some((_, incumbent)) if rank < *incumbent => {}
                    _ => {
                        let _ = winners.insert(longhand.id, (longhand, rank));
                    }
                }
            }
        }
    }
    winners
}

/// Ordering key of the cascade: importance first, then specificity
/// (which carries the source-order tie-break in its low bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CascadeRank {
    important: bool,
    specificity: Specificity,
}

impl CascadeRank {
    fn new(flags: &PropertyFlags, specificity: Specificity) -> Self {
        Self {
            important: flags.important,
            specificity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_dom::{ElementData, NodeKind};

    fn make_element(tree: &mut DomTree, parent: NodeId, tag: &str, class: Option<&str>) -> NodeId {
        let mut data = ElementData::new(tag);
        if let Some(class) = class {
            data.set_attribute("class", class);
        }
        let id = tree.alloc(NodeKind::Element(data));
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn candidate_lookup_uses_indices() {
        let mut manager = StyleManager::new();
        let _ = manager.add_stylesheet(
            ".foo { color: red; } #bar { color: blue; } div { color: green; } * { margin: 0; }",
            "test.css",
        );
        assert_eq!(manager.by_class.get("foo").map(Vec::len), Some(1));
        assert_eq!(manager.by_id.get("bar").map(Vec::len), Some(1));
        assert_eq!(manager.by_element_name.get("div").map(Vec::len), Some(1));
        assert_eq!(manager.generic_rules.len(), 1);
    }

    #[test]
    fn usage_refcounts_track_selectors() {
        let mut manager = StyleManager::new();
        let sheet = manager.add_stylesheet(
            ".a .a [href] p { color: red; } [href] { color: blue; }",
            "test.css",
        );
        assert_eq!(manager.classnames_used_by_styles("a"), 2);
        assert_eq!(manager.attributes_used_by_styles("href"), 2);
        assert!(manager.remove_stylesheet(&sheet));
        assert_eq!(manager.classnames_used_by_styles("a"), 0);
        assert_eq!(manager.attributes_used_by_styles("href"), 0);
    }

    #[test]
    fn change_notification_fires() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut manager = StyleManager::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        manager.on_stylesheets_changed(Box::new(move || seen.set(seen.get() + 1)));

        let sheet = manager.add_stylesheet("p { color: red; }", "test.css");
        assert_eq!(count.get(), 1);
        let _ = manager.remove_stylesheet(&sheet);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn unmatched_rules_are_filtered() {
        let mut manager = StyleManager::new();
        let _ = manager.add_stylesheet(".foo { color: red; } .bar { color: blue; }", "test.css");

        let mut tree = DomTree::new();
        let element = make_element(&mut tree, NodeId::ROOT, "div", Some("foo"));

        let matched = manager.get_style_rules(&tree, element);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].rule().selector.to_string(), ".foo");
    }
}
