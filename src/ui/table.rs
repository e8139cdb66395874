use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Dataset, Pollutant};

/// How many of the visible rows the table shows.
const MAX_ROWS: usize = 50;

const HEADERS: [&str; 9] = [
    "Date", "Station", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP",
];

/// Raw-data table over the first 50 visible records.
pub fn record_table(ui: &mut Ui, dataset: &Dataset, visible: &[usize]) {
    let rows = &visible[..visible.len().min(MAX_ROWS)];
    if rows.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(100.0))
        .columns(Column::auto().at_least(56.0), HEADERS.len() - 2)
        .header(18.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &dataset.records[rows[row.index()]];
                row.col(|ui| {
                    ui.monospace(rec.timestamp.format("%Y-%m-%d %H:%M").to_string());
                });
                row.col(|ui| {
                    ui.label(&rec.station);
                });
                for pollutant in Pollutant::ALL {
                    row.col(|ui| {
                        ui.label(format!("{:.1}", pollutant.value(rec)));
                    });
                }
                row.col(|ui| {
                    ui.label(format!("{:.1}", rec.temp));
                });
            });
        });
}
