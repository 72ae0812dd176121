//! Withdrawal-bundle history table view.
//!
//! Renders the four-column history table, driven entirely through the
//! projection's table contract: row count, headers, cell text, and the
//! row-to-hash lookup for the copy button.

use crate::history_model::{HistoryRow, COLUMN_COUNT};
use anyhow::{Context, Result};
use bitcoin::Txid;
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};
use std::path::Path;

use super::super::app::GuiApp;

/// Renders the History view
pub fn view_history(app: &mut GuiApp, ui: &mut egui::Ui) {
    app.render_section_header(ui, "[#]", "WITHDRAWAL BUNDLE HISTORY");
    ui.add_space(app.theme.spacing_sm);

    // Toolbar: manual refresh, export, row count
    let mut refresh_clicked = false;
    let mut export_clicked = false;
    ui.horizontal(|ui| {
        if ui
            .add(app.theme.button_primary("Refresh"))
            .on_hover_text("Re-fetch withdrawal bundles from the node")
            .clicked()
        {
            refresh_clicked = true;
        }
        let can_export = app.model.row_count() > 0;
        if ui
            .add_enabled(can_export, egui::Button::new("Export CSV"))
            .on_hover_text("Save the current table to a CSV file")
            .clicked()
        {
            export_clicked = true;
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!("{} bundles", app.model.row_count()))
                    .color(app.theme.text_secondary),
            );
        });
    });

    if refresh_clicked {
        app.model.refresh();
        app.push_notification(format!(
            "History refreshed: {} bundles",
            app.model.row_count()
        ));
    }
    if export_clicked {
        run_export(app);
    }

    ui.add_space(app.theme.spacing_sm);
    ui.separator();

    if app.model.row_count() == 0 {
        ui.add_space(app.theme.spacing_lg);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("No withdrawal bundles for this sidechain yet")
                    .color(app.theme.text_secondary),
            );
        });
        return;
    }

    // Table body reads only through the projection; row mutation happens
    // nowhere below this point, so a mid-frame snapshot swap is impossible.
    let theme = app.theme;
    let model = &app.model;
    let mut copied: Option<Txid> = None;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(120.0)) // Sidechain block #
        .column(Column::remainder().at_least(220.0)) // Hash
        .column(Column::auto().at_least(150.0)) // Amount
        .column(Column::auto().at_least(90.0)) // Status
        .header(22.0, |mut header| {
            for col in 0..COLUMN_COUNT {
                header.col(|ui| {
                    ui.strong(model.header(col).unwrap_or_default());
                });
            }
        })
        .body(|body| {
            body.rows(20.0, model.row_count(), |mut row| {
                let index = row.index();
                // Height
                row.col(|ui| {
                    ui.label(model.cell_value(index, 0).unwrap_or_default());
                });
                // Hash: shortened, hover shows full, click-to-copy
                row.col(|ui| {
                    let full = model.cell_value(index, 1).unwrap_or_default();
                    ui.horizontal(|ui| {
                        ui.monospace(short_hash(&full)).on_hover_text(&full);
                        if ui
                            .small_button("copy")
                            .on_hover_text("Copy bundle hash")
                            .clicked()
                        {
                            ui.output_mut(|o| o.copied_text = full.clone());
                            copied = model.hash_at_row(index);
                        }
                    });
                });
                // Amount
                row.col(|ui| {
                    ui.monospace(model.cell_value(index, 2).unwrap_or_default());
                });
                // Status
                row.col(|ui| {
                    let status = model.cell_value(index, 3).unwrap_or_default();
                    ui.colored_label(theme.status_color(&status), status);
                });
            });
        });

    if let Some(txid) = copied {
        app.push_notification(format!("Copied bundle hash {}", short_hash(&txid.to_string())));
    }
}

/// Shorten a 64-char hash for table display.
fn short_hash(hash: &str) -> String {
    if hash.len() > 20 {
        format!("{}...{}", &hash[..10], &hash[hash.len() - 8..])
    } else {
        hash.to_string()
    }
}

fn run_export(app: &mut GuiApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name("withdrawal_history.csv")
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    let snapshot = app.model.snapshot();
    match export_csv(&snapshot, &path) {
        Ok(rows) => {
            app.push_notification(format!("Exported {} rows to {}", rows, path.display()));
        }
        Err(e) => {
            tracing::warn!("CSV export failed: {e:#}");
            app.push_notification(format!("Export failed: {e}"));
        }
    }
}

/// Write the snapshot to a CSV file; returns the number of data rows.
fn export_csv(rows: &[HistoryRow], path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    writer.write_record(["Sidechain block #", "Hash", "Amount (sat)", "Status"])?;
    for row in rows {
        writer.write_record([
            row.height.to_string(),
            row.txid.to_string(),
            row.amount.to_sat().to_string(),
            row.status.to_string(),
        ])?;
    }
    writer.flush().context("flush failed")?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::Amount;

    #[test]
    fn test_short_hash_truncates_long_hashes() {
        let hash = format!("{:064x}", 0xabcu32);
        let short = short_hash(&hash);
        assert!(short.len() < hash.len());
        assert!(short.contains("..."));
        assert!(hash.starts_with(&short[..10]));
    }

    #[test]
    fn test_short_hash_leaves_short_text_alone() {
        assert_eq!(short_hash("abcdef"), "abcdef");
    }

    #[test]
    fn test_export_csv_writes_header_and_rows() {
        let rows = vec![
            HistoryRow {
                height: 10,
                txid: format!("{:064x}", 1u8).parse().unwrap(),
                amount: Amount::from_sat(5_000),
                status: "Spent",
            },
            HistoryRow {
                height: 20,
                txid: format!("{:064x}", 2u8).parse().unwrap(),
                amount: Amount::from_sat(7_500),
                status: "Created",
            },
        ];

        let dir = std::env::temp_dir().join("wtview_test_export");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("history.csv");

        let written = export_csv(&rows, &path).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Sidechain block #"));
        assert!(lines[1].starts_with("10,"));
        assert!(lines[2].contains("Created"));

        std::fs::remove_file(&path).ok();
    }
}
