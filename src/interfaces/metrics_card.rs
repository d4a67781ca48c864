use crate::interfaces::theme::{self, Palette};
use eframe::egui;

/// Renders a fixed-size metric card: title, big value, optional subtitle
pub fn render_metric_card(
    ui: &mut egui::Ui,
    title: &str,
    value: &str,
    subtitle: Option<&str>,
    value_color: egui::Color32,
) {
    let card_size = egui::vec2(210.0, 100.0);

    ui.allocate_ui_with_layout(card_size, egui::Layout::top_down(egui::Align::LEFT), |ui| {
        theme::card()
            .shadow(egui::epaint::Shadow {
                offset: [0, 4],
                blur: 16,
                spread: 0,
                color: egui::Color32::from_black_alpha(100),
            })
            .show(ui, |ui| {
                ui.set_width(178.0);
                ui.set_height(68.0);

                ui.label(
                    egui::RichText::new(title.to_uppercase())
                        .size(10.0)
                        .color(Palette::INK_DIM)
                        .strong(),
                );
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(value)
                        .size(24.0)
                        .strong()
                        .color(value_color),
                );

                if let Some(sub) = subtitle {
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(sub)
                            .size(10.0)
                            .color(Palette::INK_FAINT),
                    );
                }
            });
    });
}
