use std::collections::BTreeSet;

use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use mls_salaries::data::filter::Selection;
use mls_salaries::data::model::PlayerSalaryRecord;

/// Columns shown by the player and team lookups.
const SALARY_COLUMNS: [&str; 7] = [
    "Team",
    "Last Name",
    "First Name",
    "Pos",
    "Year",
    "Base Salary",
    "Compensation",
];

/// `1234567.891` → `$1,234,567.89`
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("no data").italics());
}

/// Rows of a player or team lookup.
pub fn salary_table(ui: &mut Ui, id: &str, rows: &Selection<&PlayerSalaryRecord>) {
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), SALARY_COLUMNS.len())
            .header(20.0, |mut header| {
                for title in SALARY_COLUMNS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for r in rows.rows() {
                    body.row(18.0, |mut row| {
                        let cells = [
                            r.team.clone(),
                            r.last_name.clone(),
                            r.first_name.clone(),
                            r.position.to_string(),
                            r.year.to_string(),
                            format_money(r.base_salary),
                            format_money(r.compensation),
                        ];
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}

/// Single-column list of team names.
pub fn team_list(ui: &mut Ui, teams: &BTreeSet<String>) {
    if teams.is_empty() {
        no_data(ui);
        return;
    }

    ui.push_id("team_list", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::remainder().at_least(180.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Team Name");
                });
            })
            .body(|mut body| {
                for team in teams {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(team);
                        });
                    });
                }
            });
    });
}
