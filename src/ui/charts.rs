use chrono::DateTime;
use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color;
use crate::data::model::{Dataset, Pollutant};
use crate::data::stats::{CorrelationMatrix, YearlyAggregate};

/// Temperature buckets used to colour the scatter plot.
const SCATTER_BINS: usize = 10;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// PM2.5 trend line
// ---------------------------------------------------------------------------

/// PM2.5 concentration over time for the visible records.
pub fn pm25_trend(ui: &mut Ui, dataset: &Dataset, visible: &[usize]) {
    let points: PlotPoints = visible
        .iter()
        .map(|&i| {
            let rec = &dataset.records[i];
            [rec.timestamp.and_utc().timestamp() as f64, rec.pm25]
        })
        .collect();

    Plot::new("pm25_trend")
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| format_date(mark.value))
        .y_axis_label("PM2.5 (µg/m³)")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("PM2.5")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.0),
            );
        });
}

fn format_date(timestamp: f64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%Y-%m").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// PM2.5 vs NO2 scatter, coloured by temperature
// ---------------------------------------------------------------------------

/// Scatter of PM2.5 against NO2. egui_plot has no per-point colour, so the
/// temperature axis is bucketed and each bucket drawn as one point series.
pub fn pm25_no2_scatter(ui: &mut Ui, dataset: &Dataset, visible: &[usize]) {
    let mut t_min = f64::INFINITY;
    let mut t_max = f64::NEG_INFINITY;
    for &i in visible {
        let t = dataset.records[i].temp;
        t_min = t_min.min(t);
        t_max = t_max.max(t);
    }
    let span = t_max - t_min;

    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SCATTER_BINS];
    for &i in visible {
        let rec = &dataset.records[i];
        let t = if span > 0.0 {
            (rec.temp - t_min) / span
        } else {
            0.5
        };
        let b = ((t * SCATTER_BINS as f64) as usize).min(SCATTER_BINS - 1);
        buckets[b].push([rec.pm25, rec.no2]);
    }

    Plot::new("pm25_no2_scatter")
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("PM2.5 (µg/m³)")
        .y_axis_label("NO2 (µg/m³)")
        .show(ui, |plot_ui| {
            for (b, points) in buckets.into_iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let mid = t_min + (b as f64 + 0.5) * span / SCATTER_BINS as f64;
                let t = (b as f32 + 0.5) / SCATTER_BINS as f32;
                plot_ui.points(
                    Points::new(points)
                        .radius(1.8)
                        .color(color::thermal(t))
                        .name(format!("{mid:.0} °C")),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped bar chart – yearly pollutant means
// ---------------------------------------------------------------------------

/// One bar group per year, one bar per pollutant.
pub fn yearly_pollutant_bars(ui: &mut Ui, yearly: &[YearlyAggregate]) {
    let palette = color::generate_palette(Pollutant::ALL.len());
    let group_width = 0.8;
    let slot = group_width / Pollutant::ALL.len() as f64;

    Plot::new("yearly_means")
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| {
            let v = mark.value;
            if (v - v.round()).abs() < 0.05 {
                format!("{:.0}", v.round())
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for (k, &pollutant) in Pollutant::ALL.iter().enumerate() {
                let bars: Vec<Bar> = yearly
                    .iter()
                    .map(|agg| {
                        let x = agg.year as f64 - group_width / 2.0 + (k as f64 + 0.5) * slot;
                        Bar::new(x, agg.mean(pollutant)).width(slot * 0.9)
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(palette[k])
                        .name(pollutant.label()),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated heatmap of the pollutant/temperature correlation matrix,
/// drawn directly with the painter. NaN cells (zero-variance columns or an
/// empty view) render as a neutral dash.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    let cell = 46.0_f32;
    let label_w = 54.0_f32;
    let label_h = 20.0_f32;

    let size = egui::vec2(label_w + cell * n as f32, label_h + cell * n as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(11.0);
    let text_color = ui.visuals().text_color();

    for j in 0..n {
        painter.text(
            egui::pos2(
                origin.x + label_w + (j as f32 + 0.5) * cell,
                origin.y + label_h * 0.5,
            ),
            Align2::CENTER_CENTER,
            matrix.labels[j],
            font.clone(),
            text_color,
        );
    }

    for i in 0..n {
        painter.text(
            egui::pos2(
                origin.x + label_w - 6.0,
                origin.y + label_h + (i as f32 + 0.5) * cell,
            ),
            Align2::RIGHT_CENTER,
            matrix.labels[i],
            font.clone(),
            text_color,
        );

        for j in 0..n {
            let value = matrix.get(i, j);
            let rect = Rect::from_min_size(
                egui::pos2(
                    origin.x + label_w + j as f32 * cell,
                    origin.y + label_h + i as f32 * cell,
                ),
                egui::vec2(cell, cell),
            )
            .shrink(1.0);

            if value.is_nan() {
                painter.rect_filled(rect, 2.0, ui.visuals().faint_bg_color);
                painter.text(rect.center(), Align2::CENTER_CENTER, "–", font.clone(), text_color);
            } else {
                painter.rect_filled(rect, 2.0, color::diverging(value as f32));
                let ink = if value.abs() > 0.6 {
                    Color32::WHITE
                } else {
                    Color32::BLACK
                };
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("{value:.2}"),
                    font.clone(),
                    ink,
                );
            }
        }
    }
}
