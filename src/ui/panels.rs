use eframe::egui::{self, Color32, ComboBox, RichText, ScrollArea, Ui};
use mls_salaries::data::filter::{years_descending, TENURE_BUCKETS};
use mls_salaries::data::model::TopN;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("MLS 2007-2022");
    ui.label("Insights into players and compensation");
    ui.small("Raw data obtained from https://mlsplayers.org/resources/salary-guide");
    ui.separator();

    let years = years_descending(&state.data.salaries);
    let selection = &mut state.selection;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Section 1 ----
            ui.strong("Section 1 · Highest paid players (top ten)");
            year_combo(ui, "top_ten_year", &years, &mut selection.top_ten_year);
            ui.separator();

            // ---- Section 2 ----
            ui.strong("Section 2 · Playing positions of the highest paid");
            ComboBox::from_label("Highest paid per year")
                .selected_text(selection.top_n.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for top_n in TopN::ALL {
                        ui.selectable_value(&mut selection.top_n, top_n, top_n.to_string());
                    }
                });
            ui.checkbox(
                &mut selection.show_position_grid,
                "Display compensation & playing position for each year",
            );
            ui.separator();

            // ---- Section 3 ----
            ui.strong("Section 3 · Players in the MLS for 10+ years");
            ComboBox::from_label("Years played in MLS")
                .selected_text(selection.tenure_years.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for years_in_league in TENURE_BUCKETS {
                        ui.selectable_value(
                            &mut selection.tenure_years,
                            years_in_league,
                            years_in_league.to_string(),
                        );
                    }
                });
            ui.separator();

            // ---- Section 5 ----
            ui.strong("Section 5 · Extract player information");
            ui.label("Player surname (exact, case-sensitive)");
            ui.text_edit_singleline(&mut selection.surname);
            ui.add_space(6.0);

            ui.checkbox(&mut selection.show_teams, "Display teams playing in MLS");
            if selection.show_teams {
                year_combo(ui, "team_year", &years, &mut selection.team_year);
            }
            ui.add_space(6.0);

            ui.label("Team name (exact, case-sensitive)");
            ui.text_edit_singleline(&mut selection.team_name);
        });
}

/// Season picker. `None` shows and means the latest season.
fn year_combo(ui: &mut Ui, id: &str, years: &[u16], selected: &mut Option<u16>) {
    let current = selected.or_else(|| years.first().copied());
    let text = current.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());

    ComboBox::from_id_salt(id)
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            for &year in years {
                if ui
                    .selectable_label(current == Some(year), year.to_string())
                    .clicked()
                {
                    *selected = Some(year);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let table = &state.data.salaries;
        ui.label(format!(
            "{} salary rows, {} seasons, {} teams  ({})",
            table.len(),
            table.years.len(),
            table.teams.len(),
            state.config.data_dir.display()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open MLS salary data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        match state.reload_from(&dir) {
            Ok(()) => log::info!("Reloaded tables from {}", dir.display()),
            Err(e) => {
                log::error!("Failed to load data folder: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
