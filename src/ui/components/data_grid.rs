use crate::db::ColumnInfo;
use crate::dom::{Document, ElementId, Selector};
use crate::search::{data_row_selector, sentinel_row_selector};
use eframe::egui;

enum GridLine {
    Data { number: usize, cells: Vec<String> },
    Message(String),
}

/// Snapshot of what the page's table currently displays.
pub struct GridView {
    pub header: Vec<String>,
    lines: Vec<GridLine>,
    pub visible_rows: usize,
    pub total_rows: usize,
}

impl GridView {
    pub fn from_document(doc: &Document, table: ElementId, sentinel_class: &str) -> Self {
        let header = match Selector::parse("thead th") {
            Ok(selector) => doc
                .query_selector_all_in(table, &selector)
                .into_iter()
                .map(|th| doc.text_content(th))
                .collect(),
            Err(_) => Vec::new(),
        };

        let data_rows = doc.query_selector_all_in(table, &data_row_selector(sentinel_class));
        let total_rows = data_rows.len();

        let mut lines: Vec<GridLine> = data_rows
            .into_iter()
            .enumerate()
            .filter(|(_, row)| doc.is_displayed(*row))
            .map(|(index, row)| GridLine::Data {
                number: index + 1,
                cells: doc
                    .element(row)
                    .children()
                    .iter()
                    .map(|&cell| doc.text_content(cell))
                    .collect(),
            })
            .collect();
        let visible_rows = lines.len();

        if let Some(sentinel) = doc.query_selector_in(table, &sentinel_row_selector(sentinel_class)) {
            if doc.is_displayed(sentinel) {
                lines.push(GridLine::Message(doc.text_content(sentinel)));
            }
        }

        Self {
            header,
            lines,
            visible_rows,
            total_rows,
        }
    }
}

pub struct DataGrid {
    selected_row: Option<usize>,
}

impl DataGrid {
    pub fn new() -> Self {
        Self { selected_row: None }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: &GridView, columns: &[ColumnInfo]) {
        let column_count = view.header.len().max(1);
        let available_height = ui.available_height();

        egui::ScrollArea::horizontal()
            .id_source("data_grid")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                use egui_extras::{Column, TableBuilder};

                let table = TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .vscroll(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::initial(50.0).at_least(40.0).resizable(false)) // Line number column
                    .columns(Column::initial(140.0).at_least(80.0).resizable(true).clip(true), column_count)
                    .min_scrolled_height(available_height);

                table
                    .header(22.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("#");
                        });

                        for (col_index, name) in view.header.iter().enumerate() {
                            header.col(|ui| {
                                ui.vertical(|ui| {
                                    ui.horizontal(|ui| {
                                        match columns.get(col_index) {
                                            Some(c) if c.is_primary_key => {
                                                ui.label(egui::RichText::new("🔑").color(egui::Color32::from_rgb(255, 215, 0)));
                                            }
                                            Some(c) if c.is_foreign_key => {
                                                ui.label(egui::RichText::new("🔗").color(egui::Color32::from_rgb(150, 150, 255)));
                                            }
                                            _ => {}
                                        }
                                        ui.strong(name);
                                    });

                                    if let Some(column) = columns.get(col_index).filter(|c| !c.data_type.is_empty()) {
                                        ui.label(egui::RichText::new(&column.data_type)
                                            .size(9.0)
                                            .color(egui::Color32::from_rgb(150, 150, 150)));
                                    }
                                });
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, view.lines.len(), |mut row_ui| {
                            match &view.lines[row_ui.index()] {
                                GridLine::Data { number, cells } => {
                                    let is_selected = self.selected_row == Some(*number);

                                    row_ui.col(|ui| {
                                        if self.selectable_cell(ui, *number, is_selected) {
                                            self.toggle_selection(*number);
                                        }
                                        ui.label(egui::RichText::new(number.to_string())
                                            .color(egui::Color32::from_rgb(150, 150, 150)));
                                    });

                                    for col_index in 0..column_count {
                                        let cell = cells.get(col_index).map(String::as_str).unwrap_or("");
                                        row_ui.col(|ui| {
                                            if self.selectable_cell(ui, *number, is_selected) {
                                                self.toggle_selection(*number);
                                            }

                                            ui.style_mut().wrap = Some(false);
                                            let label_response = ui.add(
                                                egui::Label::new(cell)
                                                    .truncate(true)
                                                    .selectable(true)
                                            );

                                            // Right click context menu to copy cell value
                                            label_response.context_menu(|ui| {
                                                if ui.button("Copy Cell Value").clicked() {
                                                    ui.output_mut(|o| o.copied_text = cell.to_string());
                                                    ui.close_menu();
                                                }
                                            });
                                        });
                                    }
                                }
                                GridLine::Message(text) => {
                                    row_ui.col(|_| {});
                                    row_ui.col(|ui| {
                                        ui.label(egui::RichText::new(text).italics().color(egui::Color32::GRAY));
                                    });
                                    for _ in 1..column_count {
                                        row_ui.col(|_| {});
                                    }
                                }
                            }
                        });
                    });
            });
    }

    /// Paints the selection background and reports a click anywhere in the
    /// cell.
    fn selectable_cell(&self, ui: &mut egui::Ui, number: usize, is_selected: bool) -> bool {
        let rect = ui.available_rect_before_wrap();
        if is_selected {
            ui.painter().rect_filled(rect, 0.0, egui::Color32::from_rgb(200, 200, 200));
        }
        ui.interact(rect, ui.id().with(number), egui::Sense::click()).clicked()
    }

    fn toggle_selection(&mut self, number: usize) {
        if self.selected_row == Some(number) {
            self.selected_row = None;
        } else {
            self.selected_row = Some(number);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSettings;
    use crate::dom::EventType;
    use crate::models::{PageBuilder, TableData};
    use crate::search::init_page_search;

    #[test]
    fn test_view_tracks_filtering() {
        let settings = PageSettings::default();
        let data = TableData::new(
            "subjects",
            &["Subject"],
            vec![vec!["Physics".to_string()], vec!["Chemistry".to_string()]],
        );
        let mut doc = PageBuilder::new(&settings).build(&data);
        init_page_search(&mut doc, "search-input", "data-table", None);
        doc.finish_parsing();
        let table = doc.get_element_by_id("data-table").unwrap();

        let view = GridView::from_document(&doc, table, "no-results");
        assert_eq!(view.header, vec!["Subject"]);
        assert_eq!((view.visible_rows, view.total_rows), (2, 2));
        assert_eq!(view.lines.len(), 2);

        let input = doc.get_element_by_id("search-input").unwrap();
        doc.element_mut(input).value = "chem".to_string();
        doc.dispatch_event(input, EventType::Input);
        let view = GridView::from_document(&doc, table, "no-results");
        assert_eq!(view.visible_rows, 1);
        match &view.lines[0] {
            GridLine::Data { number, cells } => {
                assert_eq!(*number, 2);
                assert_eq!(cells, &vec!["Chemistry".to_string()]);
            }
            GridLine::Message(_) => panic!("expected a data row"),
        }

        doc.element_mut(input).value = "biology".to_string();
        doc.dispatch_event(input, EventType::Input);
        let view = GridView::from_document(&doc, table, "no-results");
        assert_eq!(view.visible_rows, 0);
        assert!(matches!(&view.lines[0], GridLine::Message(m) if m == "No results found"));
    }
}
