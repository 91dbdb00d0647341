use eframe::egui::{RichText, ScrollArea, Ui};
use mls_salaries::data::view::DashboardView;

use crate::state::AppState;
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Central panel – the five dashboard sections
// ---------------------------------------------------------------------------

/// Derive every view for the current selection and render it.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let view = DashboardView::compute(&state.data, &state.selection);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Major League Soccer (2007-2022)");
            ui.label("Analyses of players and compensations");
            ui.separator();

            highest_paid(ui, state, &view);
            ui.separator();
            positions(ui, state, &view);
            ui.separator();
            long_term_players(ui, &view);
            ui.separator();
            compensation_metrics(ui, &view);
            ui.separator();
            lookups(ui, &view);
        });
}

fn highest_paid(ui: &mut Ui, state: &AppState, view: &DashboardView<'_>) {
    ui.heading("Section 1 - Highest paid players");
    ui.columns(2, |columns| {
        plot::highest_paid_chart(&mut columns[0], &view.highest_paid, &state.surname_colors);
        plot::top_ten_chart(
            &mut columns[1],
            view.top_ten_year,
            view.top_ten.rows(),
            &state.club_colors,
        );
    });
}

fn positions(ui: &mut Ui, state: &AppState, view: &DashboardView<'_>) {
    ui.heading("Section 2 - Top-paid players and their playing position");
    ui.columns(2, |columns| {
        plot::position_pie(
            &mut columns[0],
            "Distribution of playing position of all players in MLS 2007-2022",
            view.league_positions,
        );
        plot::position_pie(
            &mut columns[1],
            &format!(
                "Distribution of playing positions of top {} highest paid players 2007-2022",
                state.selection.top_n
            ),
            view.top_positions,
        );
    });

    if let Some(grid) = &view.position_grid {
        ui.add_space(8.0);
        ui.label(RichText::new("Compensation & playing position for each year").strong());
        plot::position_grid(ui, grid, &state.position_colors);
    }
}

fn long_term_players(ui: &mut Ui, view: &DashboardView<'_>) {
    ui.heading("Section 3 - Compensation of long-term players (10+ years)");
    ui.label(
        RichText::new(format!(
            "Players playing in MLS for {} years",
            view.tenure.years_under_evaluation
        ))
        .strong(),
    );
    plot::career_chart(ui, &view.careers);
}

fn compensation_metrics(ui: &mut Ui, view: &DashboardView<'_>) {
    ui.heading("Section 4 - Compensation metrics across all years");
    ui.horizontal(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new("Compensation in $").italics());
            match &view.overall {
                Some(stats) => {
                    ui.label(format!("Mean - {}", tables::format_money(stats.mean)));
                    ui.label(format!("Median - {}", tables::format_money(stats.median)));
                    ui.label(format!("Max - {}", tables::format_money(stats.max)));
                }
                None => {
                    ui.label("no data");
                }
            }
        });
        ui.vertical(|ui: &mut Ui| {
            plot::compensation_histogram(ui, &view.histogram, view.overall.as_ref());
        });
    });

    ui.add_space(8.0);
    for pair in view.yearly.chunks(2) {
        ui.columns(pair.len(), |columns| {
            for (column, (statistic, series)) in columns.iter_mut().zip(pair) {
                plot::yearly_chart(column, *statistic, series);
            }
        });
    }
}

fn lookups(ui: &mut Ui, view: &DashboardView<'_>) {
    ui.heading("Section 5");

    ui.label(RichText::new("Extract player information").strong());
    tables::salary_table(ui, "player_lookup", &view.player_rows);
    ui.separator();

    ui.label(RichText::new("Teams playing in MLS").strong());
    match (&view.teams, view.team_year) {
        (Some(teams), Some(year)) => {
            ui.label(RichText::new(format!("Year {year}")).strong());
            tables::team_list(ui, teams);
        }
        _ => {
            ui.label("Tick the checkbox 'Display teams playing in MLS' and select a year in the sidebar");
        }
    }
    ui.separator();

    ui.label(RichText::new("Extract team information").strong());
    tables::salary_table(ui, "team_lookup", &view.team_rows);
}
