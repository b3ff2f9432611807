use crate::dom::{Document, ElementId};
use eframe::egui;

#[derive(Debug, PartialEq)]
pub enum SearchBarEvent {
    Input(String),
    ClearClicked,
    Focused,
    Blurred,
}

/// Draws the page's search input and clear button from the document state.
/// Changes are reported back as events; the document is never touched here.
pub struct SearchBar;

impl SearchBar {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        doc: &Document,
        input: Option<ElementId>,
        clear: Option<ElementId>,
    ) -> Vec<SearchBarEvent> {
        let mut events = Vec::new();

        ui.horizontal(|ui| {
            ui.label("🔍");

            let Some(input) = input else {
                ui.label(egui::RichText::new("No search input on this page").color(egui::Color32::GRAY));
                return;
            };

            let mut value = doc.element(input).value.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut value)
                    .hint_text("Search...")
                    .desired_width(300.0),
            );

            if response.changed() {
                events.push(SearchBarEvent::Input(value));
            }

            if response.gained_focus() {
                events.push(SearchBarEvent::Focused);
            } else if response.lost_focus() {
                events.push(SearchBarEvent::Blurred);
            } else if doc.focused() == Some(input) && !response.has_focus() {
                response.request_focus();
            }

            if let Some(clear) = clear.filter(|&c| doc.is_displayed(c)) {
                let label = doc.text_content(clear);
                let label = if label.trim().is_empty() { "✖".to_string() } else { label };
                if ui.small_button(label).on_hover_text("Clear search").clicked() {
                    events.push(SearchBarEvent::ClearClicked);
                }
            }
        });

        events
    }
}
