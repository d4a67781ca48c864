use eframe::egui::{self, Color32, Stroke};

/// Colours of the prediction window
pub struct Palette;

impl Palette {
    pub const SURFACE: Color32 = Color32::from_rgb(18, 20, 28);
    pub const SIDEBAR: Color32 = Color32::from_rgb(24, 27, 38);
    pub const RAISED: Color32 = Color32::from_rgb(32, 36, 50);
    pub const FIELD: Color32 = Color32::from_rgb(12, 14, 20);
    pub const OUTLINE: Color32 = Color32::from_rgb(58, 64, 84);

    pub const INK: Color32 = Color32::from_rgb(226, 230, 240);
    pub const INK_DIM: Color32 = Color32::from_rgb(150, 158, 178);
    pub const INK_FAINT: Color32 = Color32::from_rgb(96, 104, 124);

    /// Realised next-day returns on the test chart
    pub const SERIES_ACTUAL: Color32 = Color32::from_rgb(94, 200, 216);
    /// Model output on the test chart
    pub const SERIES_PREDICTED: Color32 = Color32::from_rgb(232, 121, 249);

    pub const GAIN: Color32 = Color32::from_rgb(74, 222, 128);
    pub const LOSS: Color32 = Color32::from_rgb(248, 113, 113);
    pub const CAUTION: Color32 = Color32::from_rgb(250, 204, 21);
}

pub const GAP_TIGHT: f32 = 6.0;
pub const GAP: f32 = 12.0;
pub const GAP_SECTION: f32 = 22.0;
pub const CORNER: f32 = 6.0;

pub fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();

    visuals.window_fill = Palette::SURFACE;
    visuals.panel_fill = Palette::SIDEBAR;
    visuals.extreme_bg_color = Palette::FIELD;
    visuals.faint_bg_color = Palette::RAISED;
    visuals.warn_fg_color = Palette::CAUTION;
    visuals.error_fg_color = Palette::LOSS;

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, Palette::OUTLINE);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, Palette::INK);
    widgets.inactive.fg_stroke = Stroke::new(1.0, Palette::INK_DIM);
    widgets.inactive.bg_fill = Palette::RAISED;
    widgets.inactive.weak_bg_fill = Palette::RAISED;
    widgets.hovered.bg_stroke = Stroke::new(1.0, Palette::SERIES_ACTUAL);

    visuals.selection.bg_fill = Palette::SERIES_ACTUAL.linear_multiply(0.25);
    visuals.selection.stroke = Stroke::new(1.0, Palette::SERIES_ACTUAL);

    visuals
}

/// Raised box around a metric or an error
pub fn card() -> egui::Frame {
    egui::Frame::NONE
        .fill(Palette::RAISED)
        .stroke(Stroke::new(1.0, Palette::OUTLINE))
        .corner_radius(CORNER)
        .inner_margin(GAP as i8)
}

pub fn content_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(Palette::SURFACE)
        .inner_margin(egui::Margin::same(GAP_SECTION as i8))
}
