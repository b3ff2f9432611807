use std::collections::HashMap;
use std::rc::Rc;

use super::{Complex, Element, ElementId, Event, EventType, Listener, ReadyState, Selector};

type ReadyCallback = Box<dyn FnOnce(&mut Document)>;

/// A retained element tree with the small part of the browser API the page
/// search needs: id and selector lookup, text content, visibility, focus,
/// event listeners and the one-time "content loaded" signal.
pub struct Document {
    elements: Vec<Element>,
    body: ElementId,
    hiding_classes: Vec<String>,
    focused: Option<ElementId>,
    listeners: HashMap<(ElementId, EventType), Vec<Listener>>,
    ready_state: ReadyState,
    ready_callbacks: Vec<ReadyCallback>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            body: ElementId(0),
            hiding_classes: vec!["d-none".to_string()],
            focused: None,
            listeners: HashMap::new(),
            ready_state: ReadyState::Loading,
            ready_callbacks: Vec::new(),
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() == 1 && self.elements[0].children.is_empty()
    }

    pub fn append(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let id = ElementId(self.elements.len());
        element.parent = Some(parent);
        element.children.clear();
        self.elements.push(element);
        self.elements[parent.0].children.push(id);
        id
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Classes that hide an element the same way a stylesheet rule such as
    /// `.d-none { display: none }` would.
    pub fn set_hiding_classes(&mut self, classes: &[&str]) {
        self.hiding_classes = classes.iter().map(|c| c.to_string()).collect();
    }

    pub fn add_hiding_class(&mut self, class: &str) {
        if !self.hiding_classes.iter().any(|c| c == class) {
            self.hiding_classes.push(class.to_string());
        }
    }

    // Lookup

    /// All descendants of `root` in document order, `root` excluded.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.elements[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.elements[id.0].children.iter().rev().copied());
        }
        out
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .find(|el| self.elements[el.0].id.as_deref() == Some(id))
    }

    pub fn matches(&self, id: ElementId, selector: &Selector) -> bool {
        selector.alternatives.iter().any(|complex| self.matches_complex(id, complex))
    }

    fn matches_complex(&self, id: ElementId, complex: &Complex) -> bool {
        let Some((last, rest)) = complex.parts.split_last() else {
            return false;
        };
        if !last.matches(&self.elements[id.0]) {
            return false;
        }

        // Descendant combinators only, so matching each compound against the
        // nearest qualifying ancestor is enough.
        let mut ancestor = self.elements[id.0].parent;
        for part in rest.iter().rev() {
            loop {
                let Some(current) = ancestor else {
                    return false;
                };
                ancestor = self.elements[current.0].parent;
                if part.matches(&self.elements[current.0]) {
                    break;
                }
            }
        }
        true
    }

    pub fn query_selector(&self, selector: &Selector) -> Option<ElementId> {
        self.query_selector_in(self.body, selector)
            .or_else(|| self.matches(self.body, selector).then_some(self.body))
    }

    pub fn query_selector_all(&self, selector: &Selector) -> Vec<ElementId> {
        let mut out = Vec::new();
        if self.matches(self.body, selector) {
            out.push(self.body);
        }
        out.extend(self.query_selector_all_in(self.body, selector));
        out
    }

    /// First descendant of `scope` matching `selector`. Ancestors outside the
    /// scope still take part in matching, as with `Element.querySelector`.
    pub fn query_selector_in(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.matches(id, selector))
    }

    pub fn query_selector_all_in(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    // Content and visibility

    pub fn text_content(&self, id: ElementId) -> String {
        let mut text = self.elements[id.0].text.clone();
        for child in self.descendants(id) {
            text.push_str(&self.elements[child.0].text);
        }
        text
    }

    /// Whether the element itself is rendered, ignoring its ancestors.
    pub fn is_shown(&self, id: ElementId) -> bool {
        let el = &self.elements[id.0];
        !el.hidden && !el.display_none && !self.hiding_classes.iter().any(|c| el.has_class(c))
    }

    pub fn is_displayed(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(el) = current {
            if !self.is_shown(el) {
                return false;
            }
            current = self.elements[el.0].parent;
        }
        true
    }

    // Focus

    pub fn focus(&mut self, id: ElementId) {
        self.focused = Some(id);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    // Events

    pub fn add_event_listener(&mut self, target: ElementId, event_type: EventType, listener: Listener) {
        self.listeners.entry((target, event_type)).or_default().push(listener);
    }

    pub fn listener_count(&self, target: ElementId, event_type: EventType) -> usize {
        self.listeners.get(&(target, event_type)).map_or(0, |l| l.len())
    }

    /// Runs the listeners registered on `target` for `event_type` in
    /// registration order. Listeners added while dispatching are not run
    /// for this event.
    pub fn dispatch_event(&mut self, target: ElementId, event_type: EventType) {
        let listeners: Vec<Listener> = match self.listeners.get(&(target, event_type)) {
            Some(listeners) => listeners.iter().map(Rc::clone).collect(),
            None => return,
        };
        let event = Event { event_type, target };
        tracing::trace!(event = event_type.as_str(), target = target.index(), "dispatching event");
        for listener in listeners {
            listener(self, &event);
        }
    }

    // Lifecycle

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Queues `callback` for the end of parsing, or runs it right away when
    /// the document is already complete.
    pub fn on_content_loaded<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut Document) + 'static,
    {
        match self.ready_state {
            ReadyState::Loading => self.ready_callbacks.push(Box::new(callback)),
            ReadyState::Complete => callback(self),
        }
    }

    pub fn finish_parsing(&mut self) {
        if self.ready_state == ReadyState::Complete {
            return;
        }
        self.ready_state = ReadyState::Complete;
        let callbacks = std::mem::take(&mut self.ready_callbacks);
        tracing::debug!(callbacks = callbacks.len(), "content loaded");
        for callback in callbacks {
            callback(self);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn sample() -> (Document, ElementId) {
        let mut doc = Document::new();
        let body = doc.body();
        let table = doc.append(body, Element::new("table").with_id("t"));
        let thead = doc.append(table, Element::new("thead"));
        let head_row = doc.append(thead, Element::new("tr"));
        doc.append(head_row, Element::new("th").with_text("Name"));
        let tbody = doc.append(table, Element::new("tbody"));
        for name in ["Apple", "Pear"] {
            let tr = doc.append(tbody, Element::new("tr"));
            doc.append(tr, Element::new("td").with_text(name));
            doc.append(tr, Element::new("td").with_text("Fruit"));
        }
        doc.append(tbody, Element::new("tr").with_class("no-results").with_class("d-none"));
        (doc, table)
    }

    #[test]
    fn test_get_element_by_id() {
        let (doc, table) = sample();
        assert_eq!(doc.get_element_by_id("t"), Some(table));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_scoped_descendant_queries() {
        let (doc, table) = sample();
        let rows = Selector::parse("tbody tr:not(.no-results)").unwrap();
        assert_eq!(doc.query_selector_all_in(table, &rows).len(), 2);

        let sentinel = Selector::parse("tbody tr.no-results").unwrap();
        assert!(doc.query_selector_in(table, &sentinel).is_some());

        // Header rows are not under tbody.
        let all_rows = Selector::parse("tr").unwrap();
        assert_eq!(doc.query_selector_all(&all_rows).len(), 4);
    }

    #[test]
    fn test_text_content_concatenates_in_order() {
        let (doc, table) = sample();
        let rows = doc.query_selector_all_in(table, &Selector::parse("tbody tr").unwrap());
        assert_eq!(doc.text_content(rows[0]), "AppleFruit");
        assert_eq!(doc.text_content(rows[2]), "");
    }

    #[test]
    fn test_visibility_follows_ancestors_and_classes() {
        let (mut doc, table) = sample();
        let rows = doc.query_selector_all_in(table, &Selector::parse("td").unwrap());
        assert!(doc.is_displayed(rows[0]));

        doc.element_mut(table).display_none = true;
        assert!(!doc.is_displayed(rows[0]));
        assert!(doc.is_shown(rows[0]));

        let sentinel = doc.query_selector(&Selector::parse(".no-results").unwrap()).unwrap();
        assert!(!doc.is_shown(sentinel));
        doc.set_hiding_classes(&[]);
        assert!(doc.is_shown(sentinel));
    }

    #[test]
    fn test_dispatch_runs_listeners_in_order() {
        let (mut doc, table) = sample();
        let order = Rc::new(Cell::new(0u32));

        let first = Rc::clone(&order);
        doc.add_event_listener(table, EventType::Click, Rc::new(move |_: &mut Document, _: &Event| {
            first.set(first.get() * 10 + 1);
        }));
        let second = Rc::clone(&order);
        doc.add_event_listener(table, EventType::Click, Rc::new(move |_: &mut Document, event: &Event| {
            assert_eq!(event.event_type, EventType::Click);
            second.set(second.get() * 10 + 2);
        }));

        doc.dispatch_event(table, EventType::Click);
        assert_eq!(order.get(), 12);

        // No input listeners registered.
        doc.dispatch_event(table, EventType::Input);
        assert_eq!(order.get(), 12);
    }

    #[test]
    fn test_nested_dispatch() {
        let (mut doc, table) = sample();
        let inputs = Rc::new(Cell::new(0));

        let counter = Rc::clone(&inputs);
        doc.add_event_listener(table, EventType::Input, Rc::new(move |_: &mut Document, _: &Event| {
            counter.set(counter.get() + 1);
        }));
        doc.add_event_listener(table, EventType::Click, Rc::new(|doc: &mut Document, event: &Event| {
            doc.dispatch_event(event.target, EventType::Input);
        }));

        doc.dispatch_event(table, EventType::Click);
        assert_eq!(inputs.get(), 1);
    }

    #[test]
    fn test_content_loaded_runs_once() {
        let mut doc = Document::new();
        let runs = Rc::new(Cell::new(0));

        let counter = Rc::clone(&runs);
        doc.on_content_loaded(move |_| counter.set(counter.get() + 1));
        assert_eq!(runs.get(), 0);
        assert_eq!(doc.ready_state(), ReadyState::Loading);

        doc.finish_parsing();
        doc.finish_parsing();
        assert_eq!(runs.get(), 1);
        assert_eq!(doc.ready_state(), ReadyState::Complete);

        // Late registrations run immediately.
        let counter = Rc::clone(&runs);
        doc.on_content_loaded(move |_| counter.set(counter.get() + 1));
        assert_eq!(runs.get(), 2);
    }
}
