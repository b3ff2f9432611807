use crate::db::SchemaInfo;
use crate::search::{row_visible, Query};
use eframe::egui;
use std::collections::HashSet;

#[derive(Debug)]
pub enum DatabaseTreeEvent {
    TableClicked(String, String),
    SchemaToggled(String),
}

/// Schema/table list for the sidebar, with its own quick filter on
/// `schema.table` names.
pub struct DatabaseTree {
    filter: String,
}

fn matching_tables<'a>(schema: &'a SchemaInfo, query: &Query) -> Vec<&'a str> {
    schema
        .tables
        .iter()
        .filter(|table| row_visible(&format!("{}.{}", schema.name, table), query))
        .map(String::as_str)
        .collect()
}

impl DatabaseTree {
    pub fn new() -> Self {
        Self { filter: String::new() }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        schemas: &[SchemaInfo],
        expanded_schemas: &HashSet<String>,
        selected_table: &Option<(String, String)>,
    ) -> Option<DatabaseTreeEvent> {
        let mut event = None;

        ui.add(
            egui::TextEdit::singleline(&mut self.filter)
                .hint_text("Filter tables...")
                .desired_width(f32::INFINITY),
        );
        ui.separator();

        let query = Query::new(&self.filter);

        egui::ScrollArea::vertical()
            .id_source("tables_sidebar")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for schema in schemas {
                    let tables = matching_tables(schema, &query);
                    if tables.is_empty() && !query.is_empty() {
                        continue;
                    }
                    // A non-empty filter opens every schema with a match.
                    let is_expanded = !query.is_empty() || expanded_schemas.contains(&schema.name);

                    ui.horizontal(|ui| {
                        let arrow = if is_expanded { "▼" } else { "▶" };
                        if ui.button(arrow).clicked() {
                            event = Some(DatabaseTreeEvent::SchemaToggled(schema.name.clone()));
                        }
                        ui.label(egui::RichText::new(&schema.name).strong());
                        ui.label(format!("({})", tables.len()));
                    });

                    if is_expanded {
                        ui.indent(&schema.name, |ui| {
                            for table in tables {
                                let is_selected = selected_table
                                    .as_ref()
                                    .is_some_and(|(s, t)| *s == schema.name && t == table);

                                if ui.selectable_label(is_selected, format!("📊 {}", table)).clicked() {
                                    event = Some(DatabaseTreeEvent::TableClicked(schema.name.clone(), table.to_string()));
                                }
                            }
                        });
                    }
                }
            });

        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_tables() {
        let schema = SchemaInfo {
            name: "public".to_string(),
            tables: vec![
                "course_course".to_string(),
                "course_payment".to_string(),
                "auth_user".to_string(),
            ],
        };

        assert_eq!(matching_tables(&schema, &Query::new("")).len(), 3);
        assert_eq!(matching_tables(&schema, &Query::new("PAY")), vec!["course_payment"]);
        assert_eq!(matching_tables(&schema, &Query::new("public.auth")), vec!["auth_user"]);
        assert!(matching_tables(&schema, &Query::new("grade")).is_empty());
    }
}
