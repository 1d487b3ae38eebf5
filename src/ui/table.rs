use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::ListingTable;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Generic row grid
// ---------------------------------------------------------------------------

/// Render the given rows of `table` with every column, row index first.
pub fn rows_table(ui: &mut Ui, id: &str, table: &ListingTable, rows: &[usize]) {
    if rows.is_empty() {
        ui.label(RichText::new("Nenhum imóvel encontrado.").italics());
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(MAX_TABLE_HEIGHT)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(40.0))
                .columns(Column::auto().at_least(60.0), table.columns.len())
                .header(20.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("#");
                    });
                    for col in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(&col.name).on_hover_text(col.kind.to_string());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let idx = rows[row.index()];
                        row.col(|ui: &mut Ui| {
                            ui.label(RichText::new(idx.to_string()).weak());
                        });
                        for cell in &table.rows[idx] {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
    });
}

// ---------------------------------------------------------------------------
// Dashboard sections (central panel)
// ---------------------------------------------------------------------------

/// The subset of `names` that `table` lacks, in the order given.
fn absent_columns<'a>(table: &ListingTable, names: &[&'a str]) -> Vec<&'a str> {
    names
        .iter()
        .copied()
        .filter(|n| table.column_index(n).is_none())
        .collect()
}

fn missing_columns(ui: &mut Ui, names: &[&str]) {
    let list = names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ");
    ui.label(RichText::new(format!("Colunas necessárias ausentes: {list}")).weak());
}

pub fn raw_preview(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else { return };
    if !state.show_raw {
        return;
    }
    ui.heading("Dados Brutos");
    rows_table(ui, "raw_preview", table, &state.preview_rows());
    ui.separator();
}

pub fn city_section(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else { return };
    let cols = &state.config.columns;
    let absent = absent_columns(table, &[cols.city.as_str(), cols.rent.as_str()]);
    if !absent.is_empty() {
        ui.heading("Custo Total de Aluguel");
        missing_columns(ui, &absent);
        ui.separator();
        return;
    }
    let Some(report) = &state.city_report else { return };

    ui.heading(format!("Dados dos imóveis em {}", report.city));
    rows_table(ui, "city_rows", table, &report.rows);

    ui.add_space(6.0);
    ui.strong(format!("Custo Total de Aluguel para {}", report.city));
    ui.label(report.total_message());
    ui.separator();
}

pub fn rooms_section(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else { return };
    let rooms_col = state.config.columns.rooms.as_str();
    if table.column_index(rooms_col).is_none() {
        ui.heading("Filtrar por número de quartos");
        missing_columns(ui, &[rooms_col]);
        ui.separator();
        return;
    }
    let (Some(rooms), Some(rows)) = (state.selected_rooms, &state.room_rows) else {
        return;
    };

    ui.heading(format!("Imóveis com {rooms} quartos"));
    rows_table(ui, "room_rows", table, rows);
    ui.separator();
}

pub fn means_section(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        return;
    }
    ui.heading("Média de Aluguel por Cidade");

    let Some(means) = &state.city_means else {
        if let Some(table) = &state.table {
            let cols = &state.config.columns;
            missing_columns(ui, &absent_columns(table, &[cols.city.as_str(), cols.rent.as_str()]));
        }
        return;
    };

    egui::Grid::new("city_means")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Cidade");
            ui.strong("Valor Médio de Aluguel (R$)");
            ui.strong("Imóveis");
            ui.end_row();

            for m in means {
                ui.label(m.city.to_string());
                match m.mean_rent {
                    Some(mean) => ui.label(format!("{mean:.2}")),
                    None => ui.label("–"),
                };
                ui.label(m.listings.to_string());
                ui.end_row();
            }
        });
}
