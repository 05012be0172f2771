use egui::{Align, Color32, CornerRadius, Frame, Layout, Margin, RichText, Stroke, Ui};

use crate::api::{ComparisonResult, DriverProfile, DriverSummary, SessionInfo};
use crate::dashboard::{DRIVER_ONE_NUMBER, DRIVER_TWO_NUMBER, ViewModel};

use super::{
    PALETTE_CARD, PALETTE_GAIN_GREEN, PALETTE_OFF_WHITE, PALETTE_TEAM_RED, leading_float,
    team_colour,
};

const CARD_CORNER_RADIUS: u8 = 10;
const CARD_PADDING: i8 = 12;
const HEADSHOT_SIZE: f32 = 64.;
const FLAG_API_URL: &str = "https://flagsapi.com";

fn card_frame() -> Frame {
    Frame::new()
        .fill(PALETTE_CARD)
        .corner_radius(CornerRadius::same(CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(CARD_PADDING))
}

fn label_text(text: &str) -> RichText {
    RichText::new(text)
        .small()
        .color(PALETTE_OFF_WHITE.gamma_multiply(0.6))
}

fn stat_row(ui: &mut Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(label_text(label));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(RichText::new(value).strong());
        });
    });
}

/// Renders the full dashboard body for one view model snapshot. Shared by
/// the live view and the replay view; slices that have never been fetched
/// render as placeholders.
pub(crate) fn dashboard_body(ui: &mut Ui, view_model: &ViewModel) {
    session_panel(ui, &view_model.session);
    ui.add_space(8.);
    ui.columns(2, |columns| {
        driver_card(&mut columns[0], &view_model.driver_one, DRIVER_ONE_NUMBER);
        driver_card(&mut columns[1], &view_model.driver_two, DRIVER_TWO_NUMBER);
    });
    ui.add_space(8.);
    comparison_panel(ui, &view_model.comparison);
    if let Some(error) = &view_model.error {
        ui.add_space(8.);
        error_banner(ui, error);
    }
}

pub(crate) fn session_panel(ui: &mut Ui, session: &Option<SessionInfo>) {
    card_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Current Session").color(PALETTE_OFF_WHITE));
            if let Some(session) = session {
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    status_badge(ui, &session.session_status);
                });
            }
        });
        match session {
            Some(session) => {
                ui.add_space(6.);
                ui.columns(3, |columns| {
                    columns[0].label(label_text("LOCATION"));
                    columns[0].label(RichText::new(&session.circuit_short_name).strong().size(16.));
                    columns[0].label(session.location.as_str());
                    columns[1].label(label_text("SESSION"));
                    columns[1].label(RichText::new(&session.session_name).strong().size(16.));
                    columns[2].label(label_text("SCHEDULE"));
                    columns[2].label(RichText::new(&session.date_start).strong());
                    columns[2].label(format!("GMT {}", session.gmt_offset));
                });
            }
            None => {
                ui.label(RichText::new("Waiting for session data...").weak());
            }
        }
    });
}

// free-text status straight from upstream; render whatever was sent
fn status_badge(ui: &mut Ui, status: &str) {
    Frame::new()
        .stroke(Stroke::new(1., PALETTE_TEAM_RED))
        .corner_radius(CornerRadius::same(CARD_CORNER_RADIUS))
        .inner_margin(Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(status).color(PALETTE_TEAM_RED).strong());
        });
}

pub(crate) fn driver_card(ui: &mut Ui, driver: &Option<DriverProfile>, driver_number: u32) {
    card_frame().show(ui, |ui| {
        let Some(driver) = driver else {
            ui.heading(RichText::new(format!("Driver #{}", driver_number)).weak());
            ui.label(RichText::new("Waiting for driver data...").weak());
            return;
        };

        let accent = team_colour(&driver.team_colour);
        ui.horizontal(|ui| {
            if let Some(headshot_url) = &driver.headshot_url {
                ui.add(
                    egui::Image::from_uri(headshot_url.as_str())
                        .fit_to_exact_size(egui::Vec2::splat(HEADSHOT_SIZE))
                        .corner_radius(CARD_CORNER_RADIUS),
                );
            }
            ui.vertical(|ui| {
                ui.heading(RichText::new(&driver.broadcast_name).color(accent));
                ui.label(RichText::new(&driver.full_name).weak());
            });
            ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                ui.heading(
                    RichText::new(format!("#{}", driver.driver_number))
                        .color(accent.gamma_multiply(0.5)),
                );
            });
        });
        ui.add_space(6.);
        stat_row(ui, "TEAM", &driver.team_name);
        stat_row(ui, "ACRONYM", &driver.name_acronym);
        if let Some(country_code) = &driver.country_code {
            ui.horizontal(|ui| {
                ui.label(label_text("COUNTRY"));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(RichText::new(country_code).strong());
                    ui.add(
                        egui::Image::from_uri(format!(
                            "{}/{}/flat/32.png",
                            FLAG_API_URL, country_code
                        ))
                        .max_height(16.),
                    );
                });
            });
        }
    });
}

pub(crate) fn comparison_panel(ui: &mut Ui, comparison: &Option<ComparisonResult>) {
    card_frame().show(ui, |ui| {
        ui.heading(RichText::new("Head-to-Head").color(PALETTE_OFF_WHITE));
        ui.add_space(6.);
        match comparison {
            Some(comparison) => {
                ui.columns(3, |columns| {
                    driver_summary(&mut columns[0], &comparison.driver1, Align::Min);
                    delta_badge(&mut columns[1], &comparison.delta);
                    driver_summary(&mut columns[2], &comparison.driver2, Align::Max);
                });
            }
            None => {
                ui.label(RichText::new("Waiting for comparison data...").weak());
            }
        }
    });
}

fn driver_summary(ui: &mut Ui, summary: &DriverSummary, align: Align) {
    ui.with_layout(Layout::top_down(align), |ui| {
        ui.label(RichText::new(&summary.name).strong().size(18.));
        ui.label(label_text("BEST LAP"));
        ui.label(RichText::new(&summary.best_lap).strong());
        ui.label(label_text("AVG SPEED"));
        ui.label(RichText::new(format!("{:.1} km/h", summary.avg_speed)).strong());
        ui.label(label_text("POSITION"));
        ui.label(RichText::new(format!("P{}", summary.position)).strong());
    });
}

fn delta_badge(ui: &mut Ui, delta: &str) {
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.label(label_text("DELTA"));
        ui.label(RichText::new(delta).size(24.).strong().color(PALETTE_TEAM_RED));
        // positive delta means driver one is losing time to driver two
        match leading_float(delta) {
            Some(value) if value > 0. => {
                ui.label(RichText::new("▲").color(PALETTE_TEAM_RED));
            }
            Some(_) => {
                ui.label(RichText::new("▼").color(PALETTE_GAIN_GREEN));
            }
            None => {}
        }
    });
}

pub(crate) fn error_banner(ui: &mut Ui, error: &str) {
    Frame::new()
        .fill(Color32::from_rgb(58, 14, 20))
        .stroke(Stroke::new(1., PALETTE_TEAM_RED))
        .corner_radius(CornerRadius::same(CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(CARD_PADDING))
        .show(ui, |ui| {
            ui.label(RichText::new(error).color(PALETTE_OFF_WHITE));
        });
}
