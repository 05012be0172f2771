pub mod config;

use std::sync::mpsc::Receiver;
use std::time::Duration;

use config::AppConfig;
use egui::{RichText, Visuals, style::Widgets};
use log::error;

use crate::dashboard::ViewModel;
use crate::ui::{PALETTE_BLACK, PALETTE_TEAM_RED, panels};

const REPAINT_INTERVAL_MS: u64 = 500;

/// `LiveDashboardApp` renders the latest view model snapshot broadcast by
/// the refresh coordinator.
///
/// The coordinator owns the view model and pushes cloned snapshots through
/// the channel; this app only drains the channel and draws the most recent
/// state, so slow rendering can never hold back a refresh cycle.
pub struct LiveDashboardApp {
    snapshot_receiver: Receiver<ViewModel>,
    view_model: ViewModel,
    app_config: AppConfig,
}

impl LiveDashboardApp {
    pub fn new(
        snapshot_receiver: Receiver<ViewModel>,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_TEAM_RED,
            faint_bg_color: PALETTE_BLACK,
            panel_fill: PALETTE_BLACK,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        Self {
            snapshot_receiver,
            view_model: ViewModel::default(),
            app_config,
        }
    }
}

impl eframe::App for LiveDashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui_extras::install_image_loaders(ctx);

        // keep only the most recent snapshot; the coordinator broadcasts a
        // cycle-start and a settled snapshot per cycle
        while let Ok(snapshot) = self.snapshot_receiver.try_recv() {
            self.view_model = snapshot;
        }

        if let Some(outer_rect) = ctx.input(|input| input.viewport().outer_rect) {
            self.app_config.window_position = outer_rect.min.into();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("PITWALL").color(PALETTE_TEAM_RED).size(28.));
                    ui.heading(RichText::new("Team Dashboard").size(28.));
                });
                ui.add_space(8.);
                panels::dashboard_body(ui, &self.view_model);
            });
        });

        // snapshots arrive every few seconds; no need to repaint per frame
        ctx.request_repaint_after(Duration::from_millis(REPAINT_INTERVAL_MS));
    }
}
