pub(crate) mod snapshot_loader;

use std::path::PathBuf;

use egui::{RichText, Visuals, style::Widgets};
use log::error;

use crate::dashboard::ViewModel;
use crate::ui::{PALETTE_BLACK, PALETTE_TEAM_RED, panels};

/// Steps through a recorded snapshot file without touching the network.
pub struct ReplayApp {
    snapshots: Vec<ViewModel>,
    cursor: usize,
    source_file: Option<PathBuf>,
    load_error: Option<String>,
}

impl ReplayApp {
    pub fn from_file(input: &PathBuf, cc: &eframe::CreationContext<'_>) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            faint_bg_color: PALETTE_BLACK,
            panel_fill: PALETTE_BLACK,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        let mut app = Self {
            snapshots: Vec::new(),
            cursor: 0,
            source_file: None,
            load_error: None,
        };
        app.load(input.clone());
        app
    }

    fn load(&mut self, input: PathBuf) {
        match snapshot_loader::load_snapshots_jsonl(&input) {
            Ok(snapshots) => {
                self.snapshots = snapshots;
                self.cursor = 0;
                self.source_file = Some(input);
                self.load_error = None;
            }
            Err(e) => {
                error!("Could not load snapshot file {:?}: {}", input, e);
                self.load_error = Some(format!("Could not load {:?}: {}", input, e));
            }
        }
    }
}

impl eframe::App for ReplayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui_extras::install_image_loaders(ctx);

        egui::TopBottomPanel::top("replay-controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("snapshots", &["jsonl"])
                        .pick_file()
                    {
                        self.load(path);
                    }
                }
                if !self.snapshots.is_empty() {
                    let last = self.snapshots.len() - 1;
                    if ui.button("⏮").clicked() {
                        self.cursor = 0;
                    }
                    if ui.button("◀").clicked() && self.cursor > 0 {
                        self.cursor -= 1;
                    }
                    if ui.button("▶").clicked() && self.cursor < last {
                        self.cursor += 1;
                    }
                    if ui.button("⏭").clicked() {
                        self.cursor = last;
                    }
                    ui.add(
                        egui::Slider::new(&mut self.cursor, 0..=last)
                            .text(format!("of {}", self.snapshots.len())),
                    );
                }
                if let Some(source_file) = &self.source_file {
                    ui.label(RichText::new(format!("{:?}", source_file)).weak());
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(load_error) = &self.load_error {
                    ui.label(RichText::new(load_error).color(PALETTE_TEAM_RED));
                } else if let Some(snapshot) = self.snapshots.get(self.cursor) {
                    panels::dashboard_body(ui, snapshot);
                } else {
                    ui.label(RichText::new("No snapshots loaded").weak());
                }
            });
        });
    }
}
