use crate::data::model::ListingColumns;

/// Static dashboard settings, built once in `main`.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Rows shown by the raw-data preview.
    pub preview_rows: usize,
    pub columns: ListingColumns,
    pub bar_width: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_title: "Análise de Casas para Aluguel no Brasil".to_string(),
            window_size: [1200.0, 800.0],
            min_window_size: [600.0, 400.0],
            preview_rows: 5,
            columns: ListingColumns::default(),
            bar_width: 0.7,
        }
    }
}
