use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoints, Points, VLine};
use mls_salaries::data::aggregate::{CareerPoint, HistogramBin, OverallStatistics, Statistic};
use mls_salaries::data::model::{PlayerSalaryRecord, Position, PositionRatioRecord};

use crate::color::{generate_palette, pie_color, ColorMap};

fn millions(value: f64) -> f64 {
    value / 1_000_000.0
}

/// Axis formatter that shows `labels[i]` at integer positions only.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let index = mark.value.round();
        if (mark.value - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        labels.get(index as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Section 1 – highest paid
// ---------------------------------------------------------------------------

/// One bar per season; tied players share the season's slot.
pub fn highest_paid_chart(ui: &mut Ui, rows: &[&PlayerSalaryRecord], colors: &ColorMap) {
    ui.label(RichText::new("Highest paid players per year").strong());

    let mut per_year: BTreeMap<u16, usize> = BTreeMap::new();
    for r in rows {
        *per_year.entry(r.year).or_default() += 1;
    }

    let mut placed: BTreeMap<u16, usize> = BTreeMap::new();
    let mut by_surname: BTreeMap<&str, Vec<Bar>> = BTreeMap::new();
    for r in rows {
        let ties = per_year[&r.year];
        let slot = placed.entry(r.year).or_default();
        let width = 0.8 / ties as f64;
        let x = f64::from(r.year) - 0.4 + width * (*slot as f64 + 0.5);
        *slot += 1;

        by_surname.entry(r.last_name.as_str()).or_default().push(
            Bar::new(x, millions(r.compensation))
                .width(width)
                .name(format!("{} {} ({})", r.first_name, r.last_name, r.year)),
        );
    }

    Plot::new("highest_paid")
        .legend(Legend::default())
        .height(280.0)
        .allow_scroll(false)
        .x_axis_label("Year")
        .y_axis_label("Compensation in million $")
        .show(ui, |plot_ui| {
            for (surname, bars) in by_surname {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(surname)
                        .color(colors.color_for(surname)),
                );
            }
        });
}

/// Top-ten bars for one season, coloured by club.
pub fn top_ten_chart(
    ui: &mut Ui,
    year: Option<u16>,
    rows: &[&PlayerSalaryRecord],
    colors: &ColorMap,
) {
    let title = match year {
        Some(year) => format!("Highest paid players (top ten): year {year}"),
        None => "Highest paid players (top ten)".to_string(),
    };
    ui.label(RichText::new(title).strong());
    if rows.is_empty() {
        ui.label(RichText::new("no data").italics());
        return;
    }

    let labels: Vec<String> = rows.iter().map(|r| r.last_name.clone()).collect();
    let mut by_club: BTreeMap<&str, Vec<Bar>> = BTreeMap::new();
    for (i, r) in rows.iter().enumerate() {
        by_club.entry(r.club.as_str()).or_default().push(
            Bar::new(i as f64, millions(r.compensation))
                .width(0.8)
                .name(format!("{} {}, {}", r.first_name, r.last_name, r.team)),
        );
    }

    Plot::new("top_ten")
        .legend(Legend::default())
        .height(280.0)
        .allow_scroll(false)
        .x_axis_formatter(category_formatter(labels))
        .y_axis_label("Compensation in million $")
        .show(ui, |plot_ui| {
            for (club, bars) in by_club {
                plot_ui.bar_chart(BarChart::new(bars).name(club).color(colors.color_for(club)));
            }
        });
}

// ---------------------------------------------------------------------------
// Section 2 – positions
// ---------------------------------------------------------------------------

/// Pie of `observed` per position, slices pushed slightly outwards.
pub fn position_pie(ui: &mut Ui, title: &str, slices: &[PositionRatioRecord]) {
    ui.label(RichText::new(title).strong());
    let total: f64 = slices.iter().map(|s| s.observed.max(0.0)).sum();
    if total <= 0.0 {
        ui.label(RichText::new("no data").italics());
        return;
    }

    let size = ui.available_width().clamp(120.0, 300.0);
    let (response, painter) = ui.allocate_painter(egui::vec2(size, size), Sense::hover());
    let center = response.rect.center();
    let radius = size * 0.32;
    let text_color = ui.visuals().text_color();

    let mut start = -FRAC_PI_2;
    for (i, slice) in slices.iter().enumerate() {
        let share = (slice.observed.max(0.0) / total) as f32;
        if share <= 0.0 {
            continue;
        }
        let sweep = share * TAU;
        let mid = start + sweep / 2.0;
        let direction = egui::vec2(mid.cos(), mid.sin());
        let origin = center + direction * radius * 0.03;
        let color = pie_color(i);

        // Convex pieces of at most a quarter turn each.
        let pieces = ((sweep / FRAC_PI_4).ceil() as usize).max(1);
        for p in 0..pieces {
            let a0 = start + sweep * p as f32 / pieces as f32;
            let a1 = start + sweep * (p + 1) as f32 / pieces as f32;
            let mut points = vec![origin];
            for k in 0..=8 {
                let a = a0 + (a1 - a0) * k as f32 / 8.0;
                points.push(origin + egui::vec2(a.cos(), a.sin()) * radius);
            }
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }

        painter.text(
            origin + direction * radius * 0.75,
            Align2::CENTER_CENTER,
            format!("{:.1}%", share * 100.0),
            FontId::proportional(11.0),
            Color32::BLACK,
        );
        painter.text(
            origin + direction * radius * 1.2,
            Align2::CENTER_CENTER,
            slice.position.code(),
            FontId::proportional(12.0),
            text_color,
        );
        start += sweep;
    }
}

fn position_slot(position: &Position) -> f64 {
    Position::KNOWN
        .iter()
        .position(|p| p == position)
        .unwrap_or(Position::KNOWN.len()) as f64
}

/// Small multiples, three per row: compensation against position per season.
pub fn position_grid(ui: &mut Ui, grid: &BTreeMap<u16, Vec<(Position, f64)>>, colors: &ColorMap) {
    let mut labels: Vec<String> = Position::KNOWN.iter().map(|p| p.code().to_string()).collect();
    labels.push("other".to_string());

    egui::Grid::new("position_grid").show(ui, |ui| {
        for (i, (year, points)) in grid.iter().enumerate() {
            let mut by_position: BTreeMap<&Position, Vec<[f64; 2]>> = BTreeMap::new();
            for (position, compensation) in points {
                by_position
                    .entry(position)
                    .or_default()
                    .push([position_slot(position), millions(*compensation)]);
            }

            ui.vertical(|ui| {
                ui.label(format!("Year = {year}"));
                Plot::new(("position_grid", *year))
                    .width(240.0)
                    .height(170.0)
                    .allow_scroll(false)
                    .x_axis_formatter(category_formatter(labels.clone()))
                    .y_axis_label("Compensation in million $")
                    .show(ui, |plot_ui| {
                        for (position, pts) in by_position {
                            plot_ui.points(
                                Points::new(pts)
                                    .radius(2.5)
                                    .name(position.code())
                                    .color(colors.color_for(position.code())),
                            );
                        }
                    });
            });

            if (i + 1) % 3 == 0 {
                ui.end_row();
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Section 3 – careers
// ---------------------------------------------------------------------------

/// One line per player across the seasons they played.
pub fn career_chart(ui: &mut Ui, careers: &[CareerPoint]) {
    if careers.is_empty() {
        ui.label(RichText::new("no data").italics());
        return;
    }

    let mut series: Vec<(&str, Vec<[f64; 2]>)> = Vec::new();
    for point in careers {
        let xy = [f64::from(point.year), millions(point.compensation)];
        match series.iter_mut().find(|(name, _)| *name == point.unique_name) {
            Some((_, pts)) => pts.push(xy),
            None => series.push((point.unique_name.as_str(), vec![xy])),
        }
    }
    let palette = generate_palette(series.len());

    Plot::new("careers")
        .legend(Legend::default())
        .height(300.0)
        .allow_scroll(false)
        .x_axis_label("Year")
        .y_axis_label("Compensation in million $")
        .show(ui, |plot_ui| {
            for ((name, pts), color) in series.into_iter().zip(palette) {
                plot_ui.line(Line::new(PlotPoints::from(pts)).name(name).color(color).width(1.5));
            }
        });
}

// ---------------------------------------------------------------------------
// Section 4 – compensation metrics
// ---------------------------------------------------------------------------

/// Compensation histogram with mean, median and max markers.
pub fn compensation_histogram(ui: &mut Ui, bins: &[HistogramBin], overall: Option<&OverallStatistics>) {
    ui.label(RichText::new("Compensation distribution for players for 2007-2022").strong());

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::new(millions(bin.center()), bin.count as f64)
                .width(millions(bin.width()))
                .fill(Color32::from_rgb(0x87, 0xCE, 0xEB))
        })
        .collect();

    Plot::new("compensation_histogram")
        .legend(Legend::default())
        .height(300.0)
        .allow_scroll(false)
        .x_axis_label("Compensation in million $")
        .y_axis_label("No of players")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("players"));
            if let Some(stats) = overall {
                let markers = [
                    (stats.mean, "mean compensation", Color32::BLACK),
                    (stats.median, "median compensation", Color32::BLUE),
                    (stats.max, "max compensation", Color32::RED),
                ];
                for (value, name, color) in markers {
                    plot_ui.vline(
                        VLine::new(millions(value))
                            .name(name)
                            .color(color)
                            .style(LineStyle::dashed_dense()),
                    );
                }
            }
        });
}

/// Line of one per-season statistic.
pub fn yearly_chart(ui: &mut Ui, statistic: Statistic, series: &BTreeMap<u16, f64>) {
    ui.label(RichText::new(format!("{statistic} compensation")).strong());
    let points: PlotPoints = series
        .iter()
        .map(|(year, value)| [f64::from(*year), *value])
        .collect();

    Plot::new(("yearly", statistic))
        .legend(Legend::default())
        .height(220.0)
        .allow_scroll(false)
        .x_axis_label("Year")
        .y_axis_label(format!("{statistic} compensation in $"))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Compensation").width(1.5));
        });
}
