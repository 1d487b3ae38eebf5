use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, LoadStatus};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    if state.table.is_none() {
        ui.label("Nenhum arquivo carregado.");
        if ui.button("Escolher um arquivo CSV…").clicked() {
            open_file_dialog(state);
        }
        return;
    }

    let mut show_raw = state.show_raw;
    if ui.checkbox(&mut show_raw, "Exibir dados brutos").changed() {
        state.set_show_raw(show_raw);
    }
    ui.separator();

    // ---- City selector ----
    ui.strong("Escolha uma cidade:");
    if state.cities.is_empty() {
        ui.label(RichText::new("Sem coluna de cidade.").weak());
    } else {
        // Clone what we need so we can mutate state inside the combo box.
        let cities = state.cities.clone();
        let current = state
            .selected_city
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();
        egui::ComboBox::from_id_salt("city_select")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for city in cities {
                    let is_selected = state.selected_city.as_ref() == Some(&city);
                    if ui
                        .selectable_label(is_selected, city.to_string())
                        .clicked()
                    {
                        state.select_city(city);
                    }
                }
            });

        if ui.button("Exibir dados da cidade e calcular custos").clicked() {
            state.compute_city_report();
        }
    }
    ui.separator();

    // ---- Room-count slider ----
    if let Some(range) = state.room_range {
        ui.strong("Filtrar por número de quartos");
        let mut rooms = state.selected_rooms.unwrap_or(range.default);
        if ui
            .add(egui::Slider::new(&mut rooms, range.min..=range.max))
            .changed()
        {
            state.set_rooms(rooms);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Fechar"))
                .clicked()
            {
                state.close();
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.status {
            LoadStatus::Idle => {
                ui.label("Por favor, faça o upload de um arquivo CSV para começar.");
            }
            LoadStatus::Loaded {
                source,
                rows,
                columns,
            } => {
                ui.label(format!(
                    "Dados carregados com sucesso! {source}: {rows} linhas, {columns} colunas"
                ));
            }
            LoadStatus::Failed(msg) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog / drag and drop
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Escolha um arquivo CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_path(state, &path);
    }
}

fn load_path(state: &mut AppState, path: &Path) {
    match read_upload(path) {
        Ok(bytes) => state.load_bytes(&display_name(path), &bytes),
        Err(e) => state.load_failed(&e),
    }
}

fn read_upload(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_csv(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Load the first file dropped onto the window this frame.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let Some(file) = dropped.into_iter().next() else {
        return;
    };

    let name = match &file.path {
        Some(path) => display_name(path),
        None => file.name.clone(),
    };
    if !is_csv(&name) {
        log::warn!("Ignoring dropped file {name}: not a .csv");
        state.load_failed(&anyhow::anyhow!("{name} não é um arquivo CSV"));
        return;
    }

    match (&file.bytes, &file.path) {
        (Some(bytes), _) => state.load_bytes(&name, bytes),
        (None, Some(path)) => load_path(state, path),
        (None, None) => state.load_failed(&anyhow::anyhow!("{name}: arquivo sem conteúdo")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_extension_check_ignores_case() {
        assert!(is_csv("houses_to_rent.csv"));
        assert!(is_csv("DADOS.CSV"));
        assert!(!is_csv("houses.xlsx"));
        assert!(!is_csv("csv"));
    }

    #[test]
    fn unreadable_path_reports_failure() {
        let mut state = AppState::default();
        load_path(&mut state, Path::new("/definitely/not/here.csv"));
        match &state.status {
            LoadStatus::Failed(msg) => assert!(msg.contains("reading /definitely/not/here.csv")),
            other => panic!("unexpected status {other:?}"),
        }
    }
}
