use std::rc::Rc;

use super::{Document, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Input,
    Click,
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Input => "input",
            EventType::Click => "click",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: ElementId,
}

/// Listeners get the whole document so they can mutate it and dispatch
/// further events from inside the callback.
pub type Listener = Rc<dyn Fn(&mut Document, &Event)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Complete,
}
