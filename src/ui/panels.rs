use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Column;
use crate::state::{AppState, View};

/// Pickers shown in the side panel, in order.
const PICKER_COLUMNS: [Column; 8] = [
    Column::Game,
    Column::ParticipantType,
    Column::EventGender,
    Column::Medal,
    Column::Country,
    Column::Discipline,
    Column::Athlete,
    Column::Event,
];

/// Cap on checkboxes rendered per picker; large columns need the search box.
const MAX_LISTED_OPTIONS: usize = 200;

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.radio_value(&mut state.view, View::Filtered, "Filtered Data View");
    ui.radio_value(&mut state.view, View::Aggregated, "Aggregated Data View");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        if ui.small_button("Clear filters").clicked() {
            state.clear_filters();
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_range(ui, state);
            ui.separator();

            for column in PICKER_COLUMNS {
                picker(ui, state, column);
            }
        });

    // Recompute the filtered view after any widget changes.
    state.refilter();
}

fn year_range(ui: &mut Ui, state: &mut AppState) {
    ui.checkbox(&mut state.inputs.year_range_enabled, "Filter by Year Range");
    if !state.inputs.year_range_enabled {
        return;
    }
    let (lo, hi) = state.year_bounds();
    let (from, to) = &mut state.inputs.year_range;
    ui.add(egui::Slider::new(from, lo..=hi).text("from"));
    ui.add(egui::Slider::new(to, lo..=hi).text("to"));
    if *from > *to {
        ui.label(RichText::new("Empty range: 'from' is after 'to'").color(Color32::YELLOW));
    }
}

/// Collapsible multi-select for one column.
fn picker(ui: &mut Ui, state: &mut AppState, column: Column) {
    let options = state.options_for(column);
    let n_selected = state
        .inputs
        .selections
        .get(&column)
        .map_or(0, |s| s.len());
    let header_text = format!("{}  ({n_selected}/{})", column.title(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.name())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if column == Column::Athlete {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("Search");
                    ui.text_edit_singleline(&mut state.inputs.athlete_search);
                });
            }
            if ui.small_button("None").clicked() {
                state.clear_column(column);
            }

            let needle = state.inputs.athlete_search.trim().to_lowercase();
            let mut listed = 0;
            for value in &options {
                let label = value.to_string();
                if column == Column::Athlete
                    && !needle.is_empty()
                    && !label.to_lowercase().contains(&needle)
                {
                    continue;
                }
                if listed == MAX_LISTED_OPTIONS {
                    ui.weak("… more, refine the filters to see them");
                    break;
                }
                listed += 1;

                let mut checked = state.is_selected(column, value);
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_value(column, value);
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} medals loaded, {} visible",
            state.source.display(),
            state.table.len(),
            state.derived.filtered.len()
        ));

        ui.separator();

        if ui
            .selectable_label(state.stack_by_medal, "Stack by medal")
            .clicked()
        {
            state.stack_by_medal = !state.stack_by_medal;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open medal data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => state.set_table(table, &path),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
