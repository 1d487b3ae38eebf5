use std::sync::Arc;

use crate::cache::TableCache;
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{CityMean, mean_rent_by_city};
use crate::data::filter::{
    CitySelection, RoomRange, city_choices, city_subset, room_range, rooms_subset,
};
use crate::data::model::{CellValue, ListingTable};

// ---------------------------------------------------------------------------
// Load status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Nothing uploaded yet.
    Idle,
    Loaded {
        source: String,
        rows: usize,
        columns: usize,
    },
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// UI code only reads fields and calls the event methods below; every
/// derived view is recomputed from `table` by the event that invalidates it.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until a file parses successfully).
    pub table: Option<Arc<ListingTable>>,

    /// Whether the raw-data preview is shown.
    pub show_raw: bool,

    /// Distinct cities offered by the selector.
    pub cities: Vec<CellValue>,
    pub selected_city: Option<CellValue>,
    /// Result of the last "show city" request for `selected_city`.
    pub city_report: Option<CitySelection>,

    /// Slider bounds; None when the table has no rooms column.
    pub room_range: Option<RoomRange>,
    pub selected_rooms: Option<i64>,
    pub room_rows: Option<Vec<usize>>,

    /// Mean rent per city; None when city or rent is missing.
    pub city_means: Option<Vec<CityMean>>,

    /// Bar colours keyed by city.
    pub color_map: Option<ColorMap>,

    pub status: LoadStatus,

    cache: TableCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            show_raw: false,
            cities: Vec::new(),
            selected_city: None,
            city_report: None,
            room_range: None,
            selected_rooms: None,
            room_rows: None,
            city_means: None,
            color_map: None,
            status: LoadStatus::Idle,
            cache: TableCache::new(),
        }
    }

    /// Parse an upload (through the cache) and rebuild every derived view.
    ///
    /// On failure the session has no table and the status carries the error.
    pub fn load_bytes(&mut self, source: &str, bytes: &[u8]) {
        match self.cache.get_or_load(bytes) {
            Ok(table) => {
                log::info!(
                    "Loaded {} listings with {} columns from {source}",
                    table.len(),
                    table.columns.len()
                );
                log::debug!(
                    "upload cache: {} hits, {} misses, key {:?}",
                    self.cache.hits(),
                    self.cache.misses(),
                    self.cache.key().map(|k| k.as_str())
                );
                if table.is_empty() {
                    log::warn!("{source} has a header but no data rows");
                }
                self.set_table(source, table);
            }
            Err(e) => {
                let err = anyhow::Error::new(e);
                log::error!("Failed to load {source}: {err:#}");
                self.clear_table();
                self.status = LoadStatus::Failed(format!("Erro ao carregar o arquivo: {err:#}"));
            }
        }
    }

    /// Report a failure that happened before any bytes were available.
    pub fn load_failed(&mut self, err: &anyhow::Error) {
        log::error!("Failed to read upload: {err:#}");
        self.clear_table();
        self.status = LoadStatus::Failed(format!("Erro ao carregar o arquivo: {err:#}"));
    }

    /// Ingest a parsed table and initialise selections.
    fn set_table(&mut self, source: &str, table: Arc<ListingTable>) {
        let columns = &self.config.columns;

        self.cities = city_choices(&table, columns);
        self.selected_city = self.cities.first().cloned();
        self.city_report = None;

        self.room_range = room_range(&table, columns);
        if self.room_range.is_none() {
            log::warn!("No '{}' column; room filter disabled", columns.rooms);
        }
        self.selected_rooms = self.room_range.map(|r| r.default);
        self.room_rows = self
            .selected_rooms
            .and_then(|rooms| rooms_subset(&table, columns, rooms));

        self.city_means = mean_rent_by_city(&table, columns);
        if self.city_means.is_none() {
            log::warn!(
                "Need '{}' and '{}' columns; city rent views disabled",
                columns.city,
                columns.rent
            );
        }
        self.color_map = self.city_means.as_ref().map(|means| {
            let cities: Vec<CellValue> = means.iter().map(|m| m.city.clone()).collect();
            ColorMap::new(&cities)
        });

        self.status = LoadStatus::Loaded {
            source: source.to_string(),
            rows: table.len(),
            columns: table.columns.len(),
        };
        self.table = Some(table);
    }

    fn clear_table(&mut self) {
        self.table = None;
        self.cities.clear();
        self.selected_city = None;
        self.city_report = None;
        self.room_range = None;
        self.selected_rooms = None;
        self.room_rows = None;
        self.city_means = None;
        self.color_map = None;
    }

    /// Drop the session's table and forget the cached upload.
    pub fn close(&mut self) {
        self.clear_table();
        self.cache.clear();
        self.status = LoadStatus::Idle;
    }

    pub fn set_show_raw(&mut self, show: bool) {
        self.show_raw = show;
    }

    /// Row indices of the raw preview.
    pub fn preview_rows(&self) -> Vec<usize> {
        let n = self.table.as_ref().map_or(0, |t| t.len());
        (0..n.min(self.config.preview_rows)).collect()
    }

    /// Change the selected city; a report for another city is discarded.
    pub fn select_city(&mut self, city: CellValue) {
        if self.selected_city.as_ref() != Some(&city) {
            self.city_report = None;
        }
        self.selected_city = Some(city);
    }

    /// Filter by the selected city and total its rent.
    pub fn compute_city_report(&mut self) {
        let (Some(table), Some(city)) = (&self.table, &self.selected_city) else {
            return;
        };
        self.city_report = city_subset(table, &self.config.columns, city);
        match &self.city_report {
            Some(report) => log::info!("{} ({} listings)", report.total_message(), report.rows.len()),
            None => log::warn!("City report skipped: required columns missing"),
        }
    }

    /// Move the room-count slider; values outside the range are clamped.
    pub fn set_rooms(&mut self, rooms: i64) {
        let (Some(table), Some(range)) = (&self.table, self.room_range) else {
            return;
        };
        let rooms = range.clamp(rooms);
        self.selected_rooms = Some(rooms);
        self.room_rows = rooms_subset(table, &self.config.columns, rooms);
    }
}
