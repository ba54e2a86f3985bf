use std::f64::consts::TAU;

use eframe::egui::{self, Color32, Pos2, RichText, Sense, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints};

use crate::data::model::Period;
use crate::data::reshape::{
    reshape, ChartKind, ChartReadyData, DivergingPoint, IndicatorSeries, PieSlice,
};
use crate::data::summary::summarize;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – KPI strip + the active chart
// ---------------------------------------------------------------------------

/// Render the central panel for the current selection and chart kind.
pub fn chart_panel(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data file to begin  (File → Open…)");
        });
        return;
    }

    kpi_strip(ui, state);
    ui.separator();

    if state.filtered.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No rows match the current selection.");
        });
        return;
    }

    match reshape(&state.filtered, state.chart_kind) {
        ChartReadyData::Series(series) => match state.chart_kind {
            ChartKind::Line => line_chart(ui, state, &series),
            ChartKind::Bar => bar_chart(ui, state, &series),
            _ => box_chart(ui, state, &series),
        },
        ChartReadyData::Pie(slices) => pie_chart(ui, state, &slices),
        ChartReadyData::Diverging(points) => diverging_chart(ui, &points),
    }
}

/// The KPI strip from the original dashboard: total, average, top
/// contributor, and the latest month's total with its delta.
fn kpi_strip(ui: &mut Ui, state: &AppState) {
    let Some(summary) = summarize(&state.filtered) else {
        return;
    };
    ui.horizontal_wrapped(|ui: &mut Ui| {
        kpi(ui, "Total", &format!("Rs. {}", thousands(summary.total)));
        kpi(ui, "Average", &format!("Rs. {}", thousands(summary.mean)));
        kpi(ui, "Top contributor", &summary.top_indicator);
        let delta = summary
            .delta
            .map(|d| format!(" (Δ Rs. {})", thousands(d)))
            .unwrap_or_default();
        kpi(
            ui,
            "Latest",
            &format!(
                "{}: Rs. {}{delta}",
                summary.last_period,
                thousands(summary.last_total)
            ),
        );
        kpi(
            ui,
            "Range",
            &format!("{} – {}", summary.first_period, summary.last_period),
        );
    });
}

fn kpi(ui: &mut Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).strong());
    ui.add_space(12.0);
}

/// Integer-rounded value with thousands separators for the KPI strip.
fn thousands(v: f64) -> String {
    let negative = v < 0.0;
    let digits = format!("{:.0}", v.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

// ---------------------------------------------------------------------------
// Period axis helpers
// ---------------------------------------------------------------------------

/// Format a serial-month axis value back into `Mar 2015`.
fn period_label(serial: f64) -> String {
    let months = serial.round().max(0.0) as u64;
    let period = Period {
        year: (months / 12) as u16,
        month: (months % 12) as u8 + 1,
    };
    period.to_string()
}

// ---------------------------------------------------------------------------
// Line chart: one line per indicator, gaps where values are missing
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, state: &AppState, series: &[IndicatorSeries]) {
    Plot::new("line_chart")
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| period_label(mark.value))
        .y_axis_label("Value")
        .show(ui, |plot_ui| {
            for s in series {
                let color = state.color_map.color_for(&s.indicator);
                // One Line per contiguous run of observed values; nulls
                // render as gaps, never interpolated across. Runs share a
                // legend name.
                for run in s.points.split(|(_, v)| v.is_none()) {
                    if run.is_empty() {
                        continue;
                    }
                    let points: PlotPoints = run
                        .iter()
                        .map(|(p, v)| [p.serial(), v.unwrap_or_default()])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .name(&s.indicator)
                            .color(color)
                            .width(1.5),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart: grouped bars per period
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, state: &AppState, series: &[IndicatorSeries]) {
    let group_width = 0.8;
    let bar_width = group_width / series.len().max(1) as f64;

    Plot::new("bar_chart")
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| period_label(mark.value))
        .y_axis_label("Value")
        .show(ui, |plot_ui| {
            for (i, s) in series.iter().enumerate() {
                let offset = -group_width / 2.0 + bar_width * (i as f64 + 0.5);
                let bars: Vec<Bar> = s
                    .points
                    .iter()
                    .filter_map(|(p, v)| v.map(|v| (p, v)))
                    .map(|(p, v)| Bar::new(p.serial() + offset, v).width(bar_width))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(&s.indicator)
                        .color(state.color_map.color_for(&s.indicator)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Box chart: one box per indicator over the filtered range
// ---------------------------------------------------------------------------

fn box_chart(ui: &mut Ui, state: &AppState, series: &[IndicatorSeries]) {
    let names: Vec<String> = series.iter().map(|s| s.indicator.clone()).collect();

    Plot::new("box_chart")
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if mark.value.fract().abs() < 1e-6 && idx < names.len() {
                names[idx].clone()
            } else {
                String::new()
            }
        })
        .y_axis_label("Value")
        .show(ui, |plot_ui| {
            for (i, s) in series.iter().enumerate() {
                let mut values: Vec<f64> =
                    s.points.iter().filter_map(|(_, v)| *v).collect();
                if values.is_empty() {
                    continue;
                }
                values.sort_by(f64::total_cmp);
                let spread = BoxSpread::new(
                    values[0],
                    quantile(&values, 0.25),
                    quantile(&values, 0.5),
                    quantile(&values, 0.75),
                    values[values.len() - 1],
                );
                plot_ui.box_plot(
                    BoxPlot::new(vec![BoxElem::new(i as f64, spread)])
                        .name(&s.indicator)
                        .color(state.color_map.color_for(&s.indicator)),
                );
            }
        });
}

/// Linear-interpolated quantile of an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Pie chart: composition of the selected indicators
// ---------------------------------------------------------------------------

/// egui_plot has no pie primitive, so slices are painted as sector fans.
fn pie_chart(ui: &mut Ui, state: &AppState, slices: &[PieSlice]) {
    let positive: Vec<&PieSlice> = slices.iter().filter(|s| s.total > 0.0).collect();
    let total: f64 = positive.iter().map(|s| s.total).sum();
    if total <= 0.0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No positive totals to chart.");
        });
        return;
    }

    // Legend with percentages
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for slice in &positive {
            let pct = slice.total / total * 100.0;
            ui.label(
                RichText::new(format!("⏺ {} ({pct:.1}%)", slice.indicator))
                    .color(state.color_map.color_for(&slice.indicator)),
            );
        }
    });

    let side = ui.available_size().min_elem().max(100.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());
    let center = rect.center();
    let radius = side * 0.42;
    let painter = ui.painter_at(rect);

    let mut angle = -TAU / 4.0; // start at 12 o'clock
    for slice in &positive {
        let sweep = slice.total / total * TAU;
        let steps = ((sweep / 0.05).ceil() as usize).max(2);
        let mut points = vec![center];
        for step in 0..=steps {
            let a = angle + sweep * step as f64 / steps as f64;
            points.push(Pos2::new(
                center.x + radius * a.cos() as f32,
                center.y + radius * a.sin() as f32,
            ));
        }
        painter.add(egui::Shape::convex_polygon(
            points,
            state.color_map.color_for(&slice.indicator),
            Stroke::new(1.0, ui.visuals().window_fill),
        ));
        angle += sweep;
    }
}

// ---------------------------------------------------------------------------
// Diverging bar chart: monthly gains vs. losses
// ---------------------------------------------------------------------------

fn diverging_chart(ui: &mut Ui, points: &[DivergingPoint]) {
    let gains: Vec<Bar> = points
        .iter()
        .map(|p| Bar::new(p.period.serial(), p.gains).width(0.8))
        .collect();
    let losses: Vec<Bar> = points
        .iter()
        .map(|p| Bar::new(p.period.serial(), -p.losses).width(0.8))
        .collect();

    Plot::new("diverging_chart")
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| period_label(mark.value))
        .y_axis_label("Monthly change")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(gains)
                    .name("Monthly gains")
                    .color(Color32::from_rgb(0x2e, 0xa0, 0x43)),
            );
            plot_ui.bar_chart(
                BarChart::new(losses)
                    .name("Monthly losses")
                    .color(Color32::from_rgb(0xc8, 0x3a, 0x2f)),
            );
        });
}
