//! Settings view: display unit, node connection, polling.

use crate::config;
use crate::units::AmountUnit;
use crate::user_settings::UserSettings;
use eframe::egui::{self, RichText};

use super::super::app::GuiApp;

/// Renders the Settings view
pub fn view_settings(app: &mut GuiApp, ui: &mut egui::Ui) {
    app.render_section_header(ui, "[=]", "SETTINGS");
    ui.add_space(app.theme.spacing_sm);

    let theme = app.theme;
    let state = &mut app.settings_state;

    theme.frame_panel().show(ui, |ui| {
        ui.label(RichText::new("Display").strong().color(theme.text_primary));
        ui.add_space(theme.spacing_sm);

        egui::Grid::new("display_settings_grid")
            .num_columns(2)
            .spacing([theme.spacing_md, theme.spacing_sm])
            .show(ui, |ui| {
                ui.label("Amount unit:");
                egui::ComboBox::from_id_source("display_unit")
                    .selected_text(state.draft.display_unit.ticker())
                    .show_ui(ui, |ui| {
                        for unit in AmountUnit::ALL {
                            ui.selectable_value(&mut state.draft.display_unit, unit, unit.ticker());
                        }
                    });
                ui.end_row();

                ui.label("Sidechain:");
                egui::ComboBox::from_id_source("sidechain_slot")
                    .selected_text(config::sidechain_label(crate::types::SidechainId(
                        state.draft.sidechain_slot,
                    )))
                    .show_ui(ui, |ui| {
                        for sidechain in config::SIDECHAINS {
                            ui.selectable_value(
                                &mut state.draft.sidechain_slot,
                                sidechain.id,
                                format!("{} (slot {})", sidechain.label, sidechain.id),
                            );
                        }
                    });
                ui.end_row();
            });
    });

    ui.add_space(theme.spacing_md);

    theme.frame_panel().show(ui, |ui| {
        ui.label(RichText::new("Node connection").strong().color(theme.text_primary));
        ui.add_space(theme.spacing_sm);

        egui::Grid::new("node_settings_grid")
            .num_columns(2)
            .spacing([theme.spacing_md, theme.spacing_sm])
            .show(ui, |ui| {
                ui.label("RPC URL:");
                ui.add(
                    egui::TextEdit::singleline(&mut state.draft.node_rpc_url)
                        .hint_text(config::DEFAULT_RPC_URL)
                        .desired_width(280.0),
                );
                ui.end_row();

                ui.label("RPC user:");
                ui.add(egui::TextEdit::singleline(&mut state.rpc_user).desired_width(280.0));
                ui.end_row();

                ui.label("RPC password:");
                ui.add(
                    egui::TextEdit::singleline(&mut state.rpc_password)
                        .password(true)
                        .desired_width(280.0),
                );
                ui.end_row();

                ui.label("Poll interval (s):");
                ui.add(
                    egui::DragValue::new(&mut state.draft.poll_interval_secs).clamp_range(1..=600),
                );
                ui.end_row();

                ui.label("Demo mode:");
                ui.checkbox(
                    &mut state.draft.demo_mode,
                    "use built-in sample data, no node",
                );
                ui.end_row();
            });
    });

    ui.add_space(theme.spacing_md);

    let mut save_clicked = false;
    ui.horizontal(|ui| {
        if ui.add(theme.button_primary("Save settings")).clicked() {
            save_clicked = true;
        }
        if let Some(status) = &state.status {
            ui.label(RichText::new(status).color(theme.text_secondary));
        }
    });

    ui.add_space(theme.spacing_sm);
    ui.label(
        RichText::new(format!("Settings file: {}", UserSettings::settings_path_display()))
            .small()
            .color(theme.text_secondary),
    );

    if save_clicked {
        save_settings(app);
    }
}

fn save_settings(app: &mut GuiApp) {
    let draft = app.settings_state.assembled_draft();

    // Validate the endpoint unless we are not going to use it
    if !draft.demo_mode {
        if let Err(e) = config::validate_rpc_url(&draft.node_rpc_url) {
            app.settings_state.status = Some(format!("Not saved: {e}"));
            return;
        }
    }

    let connection_changed = {
        let current = app.settings.get();
        current.node_rpc_url != draft.node_rpc_url
            || current.rpc_user != draft.rpc_user
            || current.rpc_password != draft.rpc_password
            || current.sidechain_slot != draft.sidechain_slot
            || current.demo_mode != draft.demo_mode
    };

    app.settings.update(|s| *s = draft.clone());
    match app.settings.get().save() {
        Ok(()) => {
            app.settings_state.status = if connection_changed {
                Some("Saved. Node and sidechain changes apply after restart.".to_string())
            } else {
                Some("Saved.".to_string())
            };
            app.push_notification("Settings saved");
        }
        Err(e) => {
            tracing::warn!("failed to save settings: {e:#}");
            app.settings_state.status = Some(format!("Save failed: {e}"));
        }
    }
}
