use eframe::egui;

#[derive(Debug)]
pub enum MenuBarEvent {
    ReloadSource,
    RefreshTables,
    ToggleSidebar,
    Quit,
}

pub struct MenuBar;

impl MenuBar {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, connection_status: &str, source_title: Option<&str>) -> Option<MenuBarEvent> {
        let mut event = None;

        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Reload").clicked() {
                    event = Some(MenuBarEvent::ReloadSource);
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    event = Some(MenuBarEvent::Quit);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Toggle Table List").clicked() {
                    event = Some(MenuBarEvent::ToggleSidebar);
                    ui.close_menu();
                }
            });

            ui.separator();

            if ui.button("🔄 Refresh").on_hover_text("Reload the table list").clicked() {
                event = Some(MenuBarEvent::RefreshTables);
            }

            ui.separator();
            ui.label(connection_status);

            if let Some(title) = source_title {
                ui.separator();
                ui.label(egui::RichText::new(title).strong());
            }
        });

        event
    }
}
