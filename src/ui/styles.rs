use eframe::egui;

/// Compact proportional text for the chrome and monospace for table cells,
/// so columns of ids and amounts line up.
pub fn setup_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let sizes = [
        (egui::TextStyle::Body, 12.0, egui::FontFamily::Monospace),
        (egui::TextStyle::Button, 12.0, egui::FontFamily::Proportional),
        (egui::TextStyle::Heading, 15.0, egui::FontFamily::Proportional),
        (egui::TextStyle::Small, 9.0, egui::FontFamily::Proportional),
        (egui::TextStyle::Monospace, 11.0, egui::FontFamily::Monospace),
    ];
    for (text_style, size, family) in sizes {
        style.text_styles.insert(text_style, egui::FontId::new(size, family));
    }

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);

    ctx.set_style(style);
}
