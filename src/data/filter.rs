use super::aggregate::sum_numeric;
use super::model::{CellValue, ListingColumns, ListingTable};

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Indices of rows whose `col` cell equals `value`, in table order.
pub fn rows_matching(table: &ListingTable, col: usize, value: &CellValue) -> Vec<usize> {
    table
        .column_cells(col)
        .filter(|(_, cell)| *cell == value)
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// City subset + total
// ---------------------------------------------------------------------------

/// Listings of one city together with their summed rent.
#[derive(Debug, Clone, PartialEq)]
pub struct CitySelection {
    pub city: CellValue,
    /// Matching row indices, original order preserved.
    pub rows: Vec<usize>,
    pub total_rent: f64,
}

impl CitySelection {
    /// The user-facing total line, rent rounded to two decimals.
    pub fn total_message(&self) -> String {
        format_city_total(&self.city, self.total_rent)
    }
}

pub fn format_city_total(city: &CellValue, total: f64) -> String {
    format!("O custo total de aluguel em {city} é R$ {total:.2}")
}

/// Select one city's listings and sum their rent.
///
/// Returns `None` when the city or rent column is missing. A city with no
/// listings is not an error: the selection is empty and the total `0.0`.
pub fn city_subset(
    table: &ListingTable,
    columns: &ListingColumns,
    city: &CellValue,
) -> Option<CitySelection> {
    let city_col = table.column_index(&columns.city)?;
    let rent_col = table.column_index(&columns.rent)?;

    let rows = rows_matching(table, city_col, city);
    let total_rent = sum_numeric(table, rent_col, &rows);

    Some(CitySelection {
        city: city.clone(),
        rows,
        total_rent,
    })
}

/// Cities offered for selection: distinct non-null values, first appearance first.
pub fn city_choices(table: &ListingTable, columns: &ListingColumns) -> Vec<CellValue> {
    table
        .column_index(&columns.city)
        .map(|col| table.distinct_values(col))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Room count
// ---------------------------------------------------------------------------

/// Bounds and suggested value for the room-count slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomRange {
    pub min: i64,
    pub max: i64,
    /// Mean room count rounded to the nearest integer.
    pub default: i64,
}

impl RoomRange {
    pub const TRIVIAL: RoomRange = RoomRange {
        min: 0,
        max: 0,
        default: 0,
    };

    pub fn clamp(&self, rooms: i64) -> i64 {
        rooms.clamp(self.min, self.max)
    }
}

/// Slider range over the numeric cells of the rooms column.
///
/// `None` when the column is missing; [`RoomRange::TRIVIAL`] when it has no
/// numeric cells (including the empty table).
pub fn room_range(table: &ListingTable, columns: &ListingColumns) -> Option<RoomRange> {
    let col = table.column_index(&columns.rooms)?;
    let values: Vec<f64> = table
        .column_cells(col)
        .filter_map(|(_, v)| v.as_f64())
        .collect();

    if values.is_empty() {
        return Some(RoomRange::TRIVIAL);
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let range = RoomRange {
        min: min.floor() as i64,
        max: max.floor() as i64,
        default: 0,
    };
    Some(RoomRange {
        default: range.clamp(mean.round() as i64),
        ..range
    })
}

/// Rows whose room count equals `rooms` exactly; `None` without a rooms column.
pub fn rooms_subset(
    table: &ListingTable,
    columns: &ListingColumns,
    rooms: i64,
) -> Option<Vec<usize>> {
    let col = table.column_index(&columns.rooms)?;
    let wanted = rooms as f64;
    Some(
        table
            .column_cells(col)
            .filter(|(_, v)| v.as_f64() == Some(wanted))
            .map(|(i, _)| i)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    const SCENARIO: &[u8] = b"city,rooms,rent amount (R$)\nSP,2,1000\nSP,3,2000\nRJ,2,1500\n";

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn city_selection_sums_its_rows() {
        let table = load_csv_bytes(SCENARIO).unwrap();
        let sel = city_subset(&table, &ListingColumns::default(), &text("SP")).unwrap();
        assert_eq!(sel.rows, vec![0, 1]);
        assert_eq!(sel.total_rent, 3000.0);
        assert_eq!(sel.total_message(), "O custo total de aluguel em SP é R$ 3000.00");
    }

    #[test]
    fn city_total_matches_manual_filter_for_every_city() {
        let csv = b"city,rooms,rent amount (R$)\nSP,1,850.5\nPOA,2,1200\nSP,4,3999.99\nBH,2,\nPOA,1,640.25\nBH,3,2100\n";
        let table = load_csv_bytes(csv).unwrap();
        let cols = ListingColumns::default();
        for city in city_choices(&table, &cols) {
            let sel = city_subset(&table, &cols, &city).unwrap();
            let manual: f64 = table
                .rows
                .iter()
                .filter(|r| r[0] == city)
                .filter_map(|r| r[2].as_f64())
                .sum();
            assert!((sel.total_rent - manual).abs() < 1e-9, "{city}");
        }
    }

    #[test]
    fn unknown_city_is_empty_with_zero_total() {
        let table = load_csv_bytes(SCENARIO).unwrap();
        let sel = city_subset(&table, &ListingColumns::default(), &text("Campinas")).unwrap();
        assert!(sel.rows.is_empty());
        assert_eq!(sel.total_rent, 0.0);
        assert!(sel.total_rent.is_sign_positive());
        assert_eq!(sel.total_message(), "O custo total de aluguel em Campinas é R$ 0.00");
    }

    #[test]
    fn city_subset_skipped_without_rent_column() {
        let table = load_csv_bytes(b"city,rooms\nSP,2\n").unwrap();
        assert_eq!(city_subset(&table, &ListingColumns::default(), &text("SP")), None);
    }

    #[test]
    fn rooms_filter_is_exact_match() {
        let table = load_csv_bytes(SCENARIO).unwrap();
        let cols = ListingColumns::default();
        assert_eq!(rooms_subset(&table, &cols, 2), Some(vec![0, 2]));
        assert_eq!(rooms_subset(&table, &cols, 3), Some(vec![1]));
    }

    #[test]
    fn every_room_count_in_range_selects_exactly_its_rows() {
        let csv = b"city,rooms,rent amount (R$)\nSP,1,1\nSP,5,1\nRJ,3,1\nRJ,1,1\nBH,,1\n";
        let table = load_csv_bytes(csv).unwrap();
        let cols = ListingColumns::default();
        let range = room_range(&table, &cols).unwrap();
        assert_eq!((range.min, range.max), (1, 5));
        for r in range.min..=range.max {
            let rows = rooms_subset(&table, &cols, r).unwrap();
            let expected: Vec<usize> = (0..table.len())
                .filter(|&i| table.cell(i, 1) == &CellValue::Integer(r))
                .collect();
            assert_eq!(rows, expected);
        }
    }

    #[test]
    fn room_range_default_is_rounded_mean() {
        let table = load_csv_bytes(SCENARIO).unwrap();
        let range = room_range(&table, &ListingColumns::default()).unwrap();
        assert_eq!(range, RoomRange { min: 2, max: 3, default: 2 });

        let table = load_csv_bytes(b"rooms\n1\n4\n4\n").unwrap();
        assert_eq!(room_range(&table, &ListingColumns::default()).unwrap().default, 3);
    }

    #[test]
    fn room_range_degenerate_tables() {
        let cols = ListingColumns::default();
        let empty = load_csv_bytes(b"rooms\n").unwrap();
        assert_eq!(room_range(&empty, &cols), Some(RoomRange::TRIVIAL));

        let single = load_csv_bytes(b"rooms\n2\n2\n").unwrap();
        assert_eq!(room_range(&single, &cols), Some(RoomRange { min: 2, max: 2, default: 2 }));
    }

    #[test]
    fn missing_rooms_column_skips_room_filter() {
        let table = load_csv_bytes(b"city,rent amount (R$)\nSP,1000\n").unwrap();
        let cols = ListingColumns::default();
        assert_eq!(room_range(&table, &cols), None);
        assert_eq!(rooms_subset(&table, &cols, 2), None);
    }
}
