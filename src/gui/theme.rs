//! Theme and styling for the GUI.

use eframe::egui;

/// Centralized colors, spacing, and styled widget factories.
#[derive(Clone, Copy)]
pub struct AppTheme {
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub panel_fill: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    pub primary: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // Dark slate background with amber accents
            background: egui::Color32::from_rgb(16, 18, 22),
            surface: egui::Color32::from_rgb(24, 27, 33),
            panel_fill: egui::Color32::from_rgb(20, 23, 28),
            text_primary: egui::Color32::from_rgb(230, 225, 210),
            text_secondary: egui::Color32::from_rgb(150, 150, 150),

            primary: egui::Color32::from_rgb(255, 179, 0),
            success: egui::Color32::from_rgb(80, 200, 120),
            warning: egui::Color32::from_rgb(255, 170, 0),
            error: egui::Color32::from_rgb(235, 90, 90),

            spacing_xs: 4.0,
            spacing_sm: 8.0,
            spacing_md: 16.0,
            spacing_lg: 24.0,
        }
    }
}

impl AppTheme {
    /// Framed panel for grouped content.
    pub fn frame_panel(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.surface)
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(45, 50, 58)))
            .rounding(4.0)
            .inner_margin(self.spacing_md)
    }

    /// Primary action button.
    pub fn button_primary(&self, text: &str) -> egui::Button<'static> {
        egui::Button::new(
            egui::RichText::new(text.to_string())
                .color(egui::Color32::from_rgb(20, 20, 20))
                .strong(),
        )
        .fill(self.primary)
    }

    /// Color for a withdrawal-bundle status label.
    pub fn status_color(&self, status: &str) -> egui::Color32 {
        match status {
            "Spent" => self.success,
            "Failed" => self.error,
            "Created" => self.warning,
            _ => self.text_secondary,
        }
    }
}

/// Apply the theme to the egui context.
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = theme.panel_fill;
    style.visuals.window_fill = theme.background;
    style.visuals.extreme_bg_color = theme.background;
    style.visuals.override_text_color = Some(theme.text_primary);
    style.visuals.widgets.noninteractive.bg_fill = theme.surface;
    style.visuals.widgets.inactive.bg_fill = theme.surface;
    style.visuals.selection.bg_fill = theme.primary.linear_multiply(0.3);

    style.spacing.item_spacing = egui::vec2(theme.spacing_sm, theme.spacing_sm);
    style.spacing.button_padding = egui::vec2(theme.spacing_md, theme.spacing_xs);

    ctx.set_style(style);
}
