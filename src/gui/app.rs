//! Main GUI application module
//!
//! Contains the GuiApp struct, section navigation, and the wiring between
//! the history projection, the record source, and the tip notifier.

use crate::{
    config::{self, Config},
    history_model::WithdrawalHistoryModel,
    notifier::ChainTipNotifier,
    rpc::RpcBundleSource,
    source::{BundleSource, MemoryBundleStore},
    types::ChainTip,
    units::UnitProvider,
    user_settings::{SharedSettings, UserSettings},
};
use anyhow::anyhow;
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use super::notifications::NotificationEntry;
use super::theme::{configure_style, AppTheme};
use super::views;

const MAX_NOTIFICATIONS: usize = 50;

/// GUI section enum for navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuiSection {
    History,
    Settings,
}

/// Editable state behind the Settings view.
pub(crate) struct SettingsState {
    pub(crate) draft: UserSettings,
    /// Text-field mirrors of the optional credential fields
    pub(crate) rpc_user: String,
    pub(crate) rpc_password: String,
    pub(crate) status: Option<String>,
}

impl SettingsState {
    fn from_settings(settings: &UserSettings) -> Self {
        Self {
            draft: settings.clone(),
            rpc_user: settings.rpc_user.clone().unwrap_or_default(),
            rpc_password: settings.rpc_password.clone().unwrap_or_default(),
            status: None,
        }
    }

    /// Draft with the credential text fields folded back in.
    pub(crate) fn assembled_draft(&self) -> UserSettings {
        let mut draft = self.draft.clone();
        draft.rpc_user = Some(self.rpc_user.trim().to_string()).filter(|s| !s.is_empty());
        draft.rpc_password =
            Some(self.rpc_password.clone()).filter(|_| !self.rpc_user.trim().is_empty());
        draft
    }
}

pub struct GuiApp {
    pub(crate) theme: AppTheme,
    pub(crate) section: GuiSection,
    pub(crate) config: Config,
    pub(crate) settings: Arc<SharedSettings>,
    pub(crate) model: WithdrawalHistoryModel,
    pub(crate) settings_state: SettingsState,
    pub(crate) notifications: VecDeque<NotificationEntry>,
    pub(crate) latest_tip: Option<ChainTip>,
    /// Kept alive so the background poller keeps running.
    _notifier: ChainTipNotifier,
}

impl GuiApp {
    pub fn new(config: Config, user_settings: UserSettings, ctx: &egui::Context) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        let settings = SharedSettings::new(user_settings.clone());
        let mut notifications = VecDeque::new();

        let source = build_source(&config, &user_settings, &mut notifications);

        let mut model = WithdrawalHistoryModel::new(Arc::clone(&source), config.sidechain);
        let provider: Arc<dyn UnitProvider> = settings.clone();
        model.bind_unit_provider(Some(Arc::downgrade(&provider)));

        let notifier = ChainTipNotifier::new();
        model.bind_notifier(Some(notifier.subscribe()));
        notifier.spawn_poller(Arc::clone(&source), config.poll_interval);

        // Initial fill so the table is populated before the first tip event
        model.refresh();

        Self {
            theme,
            section: GuiSection::History,
            config,
            settings_state: SettingsState::from_settings(&user_settings),
            settings,
            model,
            notifications,
            latest_tip: None,
            _notifier: notifier,
        }
    }

    pub(crate) fn push_notification(&mut self, message: impl Into<String>) {
        self.notifications.push_back(NotificationEntry::new(message));
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }

    /// Small bracketed tag plus heading, shared by all views.
    pub(crate) fn render_section_header(&self, ui: &mut egui::Ui, tag: &str, title: &str) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(tag).color(self.theme.primary).strong());
            ui.heading(RichText::new(title).color(self.theme.text_primary));
        });
    }

    fn render_nav(&mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_md);
        ui.vertical_centered_justified(|ui| {
            ui.selectable_value(&mut self.section, GuiSection::History, "History");
            ui.selectable_value(&mut self.section, GuiSection::Settings, "Settings");
        });

        ui.add_space(self.theme.spacing_lg);
        ui.separator();
        ui.add_space(self.theme.spacing_sm);

        ui.label(
            RichText::new(config::sidechain_label(self.model.sidechain()))
                .color(self.theme.text_primary)
                .strong(),
        );
        if self.config.demo_mode {
            ui.label(RichText::new("demo mode").color(self.theme.warning).small());
        } else {
            ui.label(
                RichText::new(&self.config.rpc_url)
                    .color(self.theme.text_secondary)
                    .small(),
            );
        }

        ui.add_space(self.theme.spacing_sm);
        match &self.latest_tip {
            Some(tip) => {
                ui.label(format!("Tip: block #{}", tip.height));
                if tip.header_only {
                    ui.label(RichText::new("syncing...").color(self.theme.warning).small());
                } else if tip.verification_progress < 0.9999 {
                    ui.label(
                        RichText::new(format!(
                            "{:.2}% verified",
                            tip.verification_progress * 100.0
                        ))
                        .color(self.theme.text_secondary)
                        .small(),
                    );
                }
            }
            None => {
                ui.label(RichText::new("Waiting for chain tip...").color(self.theme.text_secondary));
            }
        }
    }

    fn render_notifications(&self, ui: &mut egui::Ui) {
        if self.notifications.is_empty() {
            return;
        }
        for entry in self.notifications.iter().rev().take(3) {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(entry.time_ago())
                        .color(self.theme.text_secondary)
                        .small(),
                );
                ui.label(RichText::new(&entry.message).small());
            });
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Drain tip events; spec-wise this is the notifier → refresh wiring
        if let Some(tip) = self.model.poll_notifier() {
            self.latest_tip = Some(tip);
            let entry = NotificationEntry::tip_advanced(&tip, self.model.sidechain());
            self.notifications.push_back(entry);
            while self.notifications.len() > MAX_NOTIFICATIONS {
                self.notifications.pop_front();
            }
        }
        // Keep polling even while the window is idle
        ctx.request_repaint_after(Duration::from_millis(500));

        egui::SidePanel::left("nav_panel")
            .resizable(false)
            .default_width(190.0)
            .show(ctx, |ui| {
                self.render_nav(ui);
            });

        egui::TopBottomPanel::bottom("notification_panel").show(ctx, |ui| {
            self.render_notifications(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.section {
            GuiSection::History => views::view_history(self, ui),
            GuiSection::Settings => views::view_settings(self, ui),
        });
    }
}

/// Pick the record source the app runs against.
fn build_source(
    config: &Config,
    settings: &UserSettings,
    notifications: &mut VecDeque<NotificationEntry>,
) -> Arc<dyn BundleSource> {
    if config.demo_mode {
        tracing::info!("demo mode: using seeded in-memory store");
        return Arc::new(MemoryBundleStore::seeded_demo(config.sidechain));
    }

    let url = match config::validate_rpc_url(&config.rpc_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("bad RPC URL, starting disconnected: {e:#}");
            notifications.push_back(NotificationEntry::new(format!(
                "Invalid node URL, check Settings: {e}"
            )));
            return Arc::new(MemoryBundleStore::new());
        }
    };

    match RpcBundleSource::new(url) {
        Ok(source) => {
            let source = match settings.rpc_credentials() {
                Some((user, password)) => source.with_auth(user, password),
                None => source,
            };
            Arc::new(source)
        }
        Err(e) => {
            tracing::warn!("failed to build RPC client, starting disconnected: {e:#}");
            notifications.push_back(NotificationEntry::new(format!(
                "Could not set up node connection: {e}"
            )));
            Arc::new(MemoryBundleStore::new())
        }
    }
}

pub fn launch(mut config: Config) -> anyhow::Result<()> {
    // Load user settings and let them drive the runtime config
    let user_settings = UserSettings::load();
    if user_settings != UserSettings::default() {
        config = Config::from_settings(&user_settings);
    }
    config.apply_env_overrides();

    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(GuiApp::new(config.clone(), user_settings.clone(), &cc.egui_ctx)) as Box<dyn App>
    };

    let viewport = egui::ViewportBuilder::default().with_inner_size([1020.0, 640.0]);

    let native_options = NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Wtview - Withdrawal Bundle History",
        native_options,
        Box::new(app_creator),
    )
    .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}
