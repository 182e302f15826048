use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::aggregate::MedalTable;
use crate::data::model::{Column, MedalType, Table};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Filtered rows
// ---------------------------------------------------------------------------

/// Virtualized grid of every record in `table`.
pub fn records_table(ui: &mut Ui, table: &Table) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(TableColumn::auto().at_least(60.0), Column::ALL.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for column in Column::ALL {
                header.col(|ui| {
                    ui.strong(column.title());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.len(), |mut row| {
                let record = &table.rows()[row.index()];
                for column in Column::ALL {
                    row.col(|ui| {
                        ui.label(column.value_of(record).to_string());
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Medal tables
// ---------------------------------------------------------------------------

/// Ranked medal table with one column per medal and a total.
pub fn medal_table_view(ui: &mut Ui, id: &str, medals: &MedalTable) {
    let ranked = medals.ranked();
    ui.push_id(id, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(300.0)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(TableColumn::auto().at_least(160.0))
            .columns(TableColumn::auto().at_least(40.0), MedalType::ALL.len() + 1)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong(medals.group_by().title());
                });
                for medal in MedalType::ALL {
                    header.col(|ui| {
                        ui.strong(medal.emoji()).on_hover_text(medal.label());
                    });
                }
                header.col(|ui| {
                    ui.strong("Medals Total");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, ranked.len(), |mut row| {
                    let (key, tally) = &ranked[row.index()];
                    row.col(|ui| {
                        ui.label(key.to_string());
                    });
                    for medal in MedalType::ALL {
                        row.col(|ui| {
                            ui.label(tally.get(medal).to_string());
                        });
                    }
                    row.col(|ui| {
                        ui.label(tally.total().to_string());
                    });
                });
            });
    });
}
