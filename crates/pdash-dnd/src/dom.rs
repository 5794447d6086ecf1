//! A minimal element tree standing in for the dashboard's DOM.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`ElementId`]. An element is *connected* when its parent chain reaches
//! the body. Structural changes under a connected parent are queued as
//! [`MutationRecord`]s, the way a subtree mutation observer on the body
//! would see them.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DndError, DndResult};

/// Handle to an element in a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One child-list change: nodes inserted and nodes taken out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationRecord {
    pub added: Vec<ElementId>,
    pub removed: Vec<ElementId>,
}

#[derive(Clone, Debug, Default)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    dom_id: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

#[derive(Clone, Debug)]
pub struct Document {
    elements: Vec<Element>,
    body: ElementId,
    mutations: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only its body.
    pub fn new() -> Self {
        Self {
            elements: vec![Element {
                tag: "body".into(),
                ..Element::default()
            }],
            body: ElementId(0),
            mutations: Vec::new(),
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.push(Element {
            tag: tag.to_string(),
            ..Element::default()
        });
        ElementId(self.elements.len() - 1)
    }

    /// Create a detached element with classes and attributes already set.
    pub fn create(&mut self, tag: &str, classes: &[&str], attributes: &[(&str, &str)]) -> ElementId {
        let id = self.create_element(tag);
        let el = &mut self.elements[id.0];
        el.classes = classes.iter().map(|c| c.to_string()).collect();
        el.attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        id
    }

    fn get(&self, id: ElementId) -> DndResult<&Element> {
        self.elements.get(id.0).ok_or(DndError::UnknownElement(id))
    }

    fn get_mut(&mut self, id: ElementId) -> DndResult<&mut Element> {
        self.elements.get_mut(id.0).ok_or(DndError::UnknownElement(id))
    }

    pub fn exists(&self, id: ElementId) -> bool {
        id.0 < self.elements.len()
    }

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id.0).map(|e| e.tag.as_str())
    }

    // ---- Classes and attributes ----

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(id.0)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) -> DndResult<()> {
        let el = self.get_mut(id)?;
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) -> DndResult<()> {
        self.get_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements
            .get(id.0)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> DndResult<()> {
        self.get_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> DndResult<()> {
        self.get_mut(id)?.attributes.remove(name);
        Ok(())
    }

    pub fn dom_id(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id.0).and_then(|e| e.dom_id.as_deref())
    }

    pub fn set_dom_id(&mut self, id: ElementId, dom_id: &str) -> DndResult<()> {
        self.get_mut(id)?.dom_id = Some(dom_id.to_string());
        Ok(())
    }

    /// The first connected element with the given DOM id, in document order.
    pub fn get_element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&id| self.dom_id(id) == Some(dom_id))
    }

    // ---- Structure ----

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id.0).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id.0)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    /// Position of `id` among its siblings.
    pub fn index_in_parent(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Returns `true` if `node` is `ancestor` or lies beneath it.
    pub fn is_inclusive_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Returns `true` if `id` is attached to the document.
    pub fn contains(&self, id: ElementId) -> bool {
        self.is_inclusive_ancestor(self.body, id)
    }

    /// All elements beneath `root`, in document order, excluding `root`.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Connected elements carrying `class`, in document order.
    pub fn query_class(&self, class: &str) -> Vec<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Direct children of `id` carrying `class`.
    pub fn children_with_class(&self, id: ElementId, class: &str) -> Vec<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.has_class(c, class))
            .collect()
    }

    /// The first direct child of `id` carrying `class`.
    pub fn child_with_class(&self, id: ElementId, class: &str) -> Option<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.has_class(c, class))
    }

    /// Returns `true` if some element strictly beneath `id` carries `class`.
    pub fn has_descendant_with_class(&self, id: ElementId, class: &str) -> bool {
        self.descendants(id)
            .into_iter()
            .any(|d| self.has_class(d, class))
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> DndResult<()> {
        let len = self.get(parent)?.children.len();
        self.insert_child(parent, len, child)
    }

    /// Insert `child` under `parent` at `index`, detaching it first.
    ///
    /// `index` is clamped to the child count after detaching.
    pub fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId) -> DndResult<()> {
        self.get(parent)?;
        self.get(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DndError::HierarchyCycle { parent, child });
        }
        self.detach(child)?;

        let siblings = &mut self.get_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);

        if self.contains(parent) {
            self.mutations.push(MutationRecord {
                added: vec![child],
                removed: Vec::new(),
            });
        }
        Ok(())
    }

    /// Take `id` out of the tree. Its own subtree stays intact.
    pub fn remove(&mut self, id: ElementId) -> DndResult<()> {
        self.detach(id)
    }

    fn detach(&mut self, id: ElementId) -> DndResult<()> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(());
        };
        let connected = self.contains(parent);
        self.get_mut(parent)?.children.retain(|&c| c != id);
        self.get_mut(id)?.parent = None;
        if connected {
            self.mutations.push(MutationRecord {
                added: Vec::new(),
                removed: vec![id],
            });
        }
        Ok(())
    }

    /// Drain queued mutation records.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_connected_body() {
        let doc = Document::new();
        assert!(doc.contains(doc.body()));
        assert_eq!(doc.tag(doc.body()), Some("body"));
    }

    #[test]
    fn created_elements_are_detached() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert!(!doc.contains(div));
        doc.append_child(doc.body(), div).unwrap();
        assert!(doc.contains(div));
    }

    #[test]
    fn classes_and_attributes() {
        let mut doc = Document::new();
        let el = doc.create("div", &["group"], &[("data-group-id", "g1")]);
        assert!(doc.has_class(el, "group"));
        assert_eq!(doc.attribute(el, "data-group-id"), Some("g1"));
        doc.add_class(el, "group").unwrap();
        doc.add_class(el, "collapsed").unwrap();
        doc.remove_class(el, "group").unwrap();
        assert!(!doc.has_class(el, "group"));
        assert!(doc.has_class(el, "collapsed"));
        doc.remove_attribute(el, "data-group-id").unwrap();
        assert!(!doc.has_attribute(el, "data-group-id"));
    }

    #[test]
    fn insert_moves_between_parents() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("ul");
        let b = doc.create_element("ul");
        let item = doc.create_element("li");
        doc.append_child(body, a).unwrap();
        doc.append_child(body, b).unwrap();
        doc.append_child(a, item).unwrap();

        doc.insert_child(b, 0, item).unwrap();
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), [item]);
        assert_eq!(doc.parent(item), Some(b));
    }

    #[test]
    fn insert_index_is_clamped() {
        let mut doc = Document::new();
        let body = doc.body();
        let x = doc.create_element("a");
        let y = doc.create_element("b");
        doc.append_child(body, x).unwrap();
        doc.insert_child(body, 99, y).unwrap();
        assert_eq!(doc.children(body), [x, y]);
        assert_eq!(doc.index_in_parent(y), Some(1));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        let err = doc.append_child(inner, outer).unwrap_err();
        assert!(matches!(err, DndError::HierarchyCycle { .. }));
    }

    #[test]
    fn unknown_elements_are_rejected() {
        let mut doc = Document::new();
        let err = doc.append_child(doc.body(), ElementId(42)).unwrap_err();
        assert!(matches!(err, DndError::UnknownElement(_)));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("a");
        let a1 = doc.create_element("a1");
        let b = doc.create_element("b");
        doc.append_child(body, a).unwrap();
        doc.append_child(a, a1).unwrap();
        doc.append_child(body, b).unwrap();
        assert_eq!(doc.descendants(body), [a, a1, b]);
    }

    #[test]
    fn queries() {
        let mut doc = Document::new();
        let body = doc.body();
        let wrapper = doc.create("div", &["groups-wrapper"], &[]);
        let group = doc.create("div", &["group"], &[]);
        let list = doc.create("div", &["group-list"], &[]);
        doc.append_child(body, wrapper).unwrap();
        doc.append_child(wrapper, group).unwrap();
        doc.append_child(group, list).unwrap();
        doc.set_dom_id(group, "first").unwrap();

        assert_eq!(doc.query_class("group-list"), [list]);
        assert_eq!(doc.children_with_class(wrapper, "group"), [group]);
        assert_eq!(doc.child_with_class(group, "group-list"), Some(list));
        assert!(doc.has_descendant_with_class(wrapper, "group"));
        assert!(!doc.has_descendant_with_class(group, "group"));
        assert_eq!(doc.get_element_by_id("first"), Some(group));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn mutations_recorded_only_when_connected() {
        let mut doc = Document::new();
        let detached = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(detached, child).unwrap();
        assert!(doc.take_mutations().is_empty());

        doc.append_child(doc.body(), detached).unwrap();
        doc.remove(detached).unwrap();
        let batch = doc.take_mutations();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].added, [detached]);
        assert_eq!(batch[1].removed, [detached]);
        assert!(doc.take_mutations().is_empty());
    }
}
