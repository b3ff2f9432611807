use eframe::egui;

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    /// `rows` is `(visible, total)` for the current page, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, status_message: &str, rows: Option<(usize, usize)>) {
        ui.horizontal(|ui| {
            ui.label(status_message);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                match rows {
                    Some((visible, total)) if visible == total => {
                        ui.label(format!("{} rows", total));
                    }
                    Some((visible, total)) => {
                        ui.label(format!("{} of {} rows", visible, total));
                    }
                    None => {}
                }
            });
        });
    }
}
