/// Index of an element inside its `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Text owned directly by this element, rendered before its children.
    pub text: String,
    /// Current value of form controls (`input`).
    pub value: String,
    /// The `hidden` attribute.
    pub hidden: bool,
    /// Inline `style.display = 'none'`.
    pub display_none: bool,
    pub colspan: Option<usize>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            hidden: false,
            display_none: false,
            colspan: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_colspan(mut self, colspan: usize) -> Self {
        self.colspan = Some(colspan);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Mirrors `classList.toggle(class, force)`: adds when `force` is true,
    /// removes otherwise.
    pub fn toggle_class(&mut self, class: &str, force: bool) {
        if force {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_class_is_idempotent() {
        let mut el = Element::new("TR").with_class("no-results");
        assert_eq!(el.tag, "tr");

        el.toggle_class("d-none", true);
        el.toggle_class("d-none", true);
        assert_eq!(el.classes, vec!["no-results", "d-none"]);

        el.toggle_class("d-none", false);
        assert!(!el.has_class("d-none"));
        assert!(el.has_class("no-results"));
    }
}
