use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone the widget domains so we can mutate state below.
    let stations = dataset.stations.clone();
    let (year_lo, year_hi) = (dataset.year_min, dataset.year_max);
    let month_domain: Vec<u32> = dataset.months.iter().copied().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Station selector ----
            ui.strong("Station");
            let current = state.criteria.station.clone();
            egui::ComboBox::from_id_salt("station")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for station in &stations {
                        if ui.selectable_label(current == *station, station).clicked() {
                            state.set_station(station.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Year range ----
            ui.strong("Years");
            let mut from = state.criteria.year_min;
            let mut to = state.criteria.year_max;
            let changed = ui
                .add(Slider::new(&mut from, year_lo..=year_hi).text("from"))
                .changed()
                | ui.add(Slider::new(&mut to, year_lo..=year_hi).text("to"))
                    .changed();
            if changed {
                state.set_year_range(from, to);
            }
            ui.separator();

            // ---- Month multiselect ----
            let n_selected = state.criteria.months.len();
            let n_total = month_domain.len();
            let header_text = format!("Months  ({n_selected}/{n_total})");

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("months")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_months();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_months();
                        }
                    });

                    for &month in &month_domain {
                        let mut checked = state.criteria.months.contains(&month);
                        let label = month
                            .checked_sub(1)
                            .and_then(|i| MONTH_NAMES.get(i as usize))
                            .copied()
                            .unwrap_or("?");
                        if ui.checkbox(&mut checked, label).changed() {
                            state.toggle_month(month);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} match filters",
                ds.len(),
                state.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open air-quality data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
