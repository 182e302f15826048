use eframe::egui::{self, ScrollArea, Ui};

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MedalBrowserApp {
    pub state: AppState,
}

impl MedalBrowserApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for MedalBrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: rows or aggregates ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Filtered => filtered_view(ui, &self.state),
            View::Aggregated => aggregated_view(ui, &self.state),
        });
    }
}

fn filtered_view(ui: &mut Ui, state: &AppState) {
    ui.heading("Olympic Medalists Filter");
    ui.label(format!("Number of records: {}", state.derived.filtered.len()));
    ui.separator();
    table::records_table(ui, &state.derived.filtered);
}

fn aggregated_view(ui: &mut Ui, state: &AppState) {
    let derived = &state.derived;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Olympic Medals Aggregated View");

            ui.label(egui::RichText::new("Aggregated Medal Count by Country").strong());
            table::medal_table_view(ui, "country_table", &derived.by_country);
            ui.add_space(12.0);

            ui.label(egui::RichText::new("Aggregated Medal Count by Athlete").strong());
            table::medal_table_view(ui, "athlete_table", &derived.by_athlete);
            ui.add_space(12.0);

            plot::medal_chart(
                ui,
                "country_chart",
                "Medals per Country",
                &derived.by_country,
                state.stack_by_medal,
                state.chart_max_bars,
            );
            ui.add_space(12.0);

            plot::medal_chart(
                ui,
                "athlete_chart",
                "Medals per Athlete",
                &derived.by_athlete,
                state.stack_by_medal,
                state.chart_max_bars,
            );
        });
}
