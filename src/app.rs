use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RentalDashApp {
    pub state: AppState,
}

impl RentalDashApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RentalDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::handle_dropped_files(ctx, &mut self.state);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables and chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Abra ou arraste um arquivo CSV  (Arquivo → Abrir…)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    table::raw_preview(ui, &self.state);
                    table::city_section(ui, &self.state);
                    table::rooms_section(ui, &self.state);
                    table::means_section(ui, &self.state);
                    plot::mean_rent_chart(ui, &self.state);
                });
        });
    }
}
