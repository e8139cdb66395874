use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, table};

// ---------------------------------------------------------------------------
// Central panel – metrics, charts, table
// ---------------------------------------------------------------------------

/// Render the dashboard body for the current state.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open an air-quality CSV to begin  (File → Open…)");
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(format!("Air quality – {}", state.criteria.station));
            ui.add_space(4.0);

            metric_cards(ui, state);
            ui.add_space(12.0);

            section(ui, "PM2.5 trend over time", |ui| {
                charts::pm25_trend(ui, dataset, &state.visible);
            });

            section(ui, "PM2.5 vs NO2, coloured by temperature", |ui| {
                charts::pm25_no2_scatter(ui, dataset, &state.visible);
            });

            section(ui, "Yearly pollutant means", |ui| {
                charts::yearly_pollutant_bars(ui, &state.yearly);
            });

            section(ui, "Pollutant correlation", |ui| {
                if let Some(matrix) = &state.correlation {
                    charts::correlation_heatmap(ui, matrix);
                }
            });

            section(ui, "Records (first 50)", |ui| {
                table::record_table(ui, dataset, &state.visible);
            });
        });
}

fn section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.strong(title);
    ui.add_space(2.0);
    add_contents(ui);
    ui.add_space(12.0);
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn metric_cards(ui: &mut Ui, state: &AppState) {
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Avg PM2.5", state.summary.pm25, "µg/m³");
        metric(&mut cols[1], "Avg NO2", state.summary.no2, "µg/m³");
        metric(&mut cols[2], "Avg CO", state.summary.co, "mg/m³");
    });
}

fn metric(ui: &mut Ui, title: &str, value: f64, unit: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(title);
            ui.heading(format_metric(value, unit));
        });
    });
}

/// An empty view has no mean; show a dash instead of NaN.
fn format_metric(value: f64, unit: &str) -> String {
    if value.is_nan() {
        "–".to_string()
    } else {
        format!("{value:.2} {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_metric;

    #[test]
    fn nan_metric_renders_as_dash() {
        assert_eq!(format_metric(f64::NAN, "µg/m³"), "–");
        assert_eq!(format_metric(12.345, "µg/m³"), "12.35 µg/m³");
    }
}
