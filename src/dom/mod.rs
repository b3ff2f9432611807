mod document;
mod element;
mod event;
mod selector;

pub use document::Document;
pub use element::{Element, ElementId};
pub use event::{Event, EventType, Listener, ReadyState};
pub use selector::{Complex, Compound, Selector, SelectorError};
