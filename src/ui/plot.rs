use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Mean rent bar chart
// ---------------------------------------------------------------------------

/// One bar per city, height = mean rent, coloured by city.
pub fn mean_rent_chart(ui: &mut Ui, state: &AppState) {
    let Some(means) = &state.city_means else {
        return;
    };
    if means.is_empty() {
        return;
    }

    ui.add_space(8.0);
    ui.strong("Comparação dos Valores Médios de Aluguel por Cidade");

    let labels: Vec<String> = means.iter().map(|m| m.city.to_string()).collect();
    let bar_width = state.config.bar_width;

    Plot::new("mean_rent_chart")
        .legend(Legend::default())
        .height(320.0)
        .x_axis_label("Cidade")
        .y_axis_label("Valor Médio de Aluguel (R$)")
        .x_axis_formatter({
            let labels = labels.clone();
            move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            }
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, m) in means.iter().enumerate() {
                // Cities without any numeric rent get no bar.
                let Some(mean) = m.mean_rent else {
                    continue;
                };
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&m.city))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let bar = Bar::new(i as f64, mean)
                    .width(bar_width)
                    .name(&labels[i]);
                let chart = BarChart::new(vec![bar])
                    .name(&labels[i])
                    .color(color);

                plot_ui.bar_chart(chart);
            }
        });
}
