use std::collections::HashMap;

use super::model::{CellValue, ListingColumns, ListingTable};

/// Sum of the numeric cells of `col` over `rows`; nulls and text are skipped.
///
/// Folds from `+0.0` so an empty selection totals `0.00`, never `-0.00`.
pub fn sum_numeric(table: &ListingTable, col: usize, rows: &[usize]) -> f64 {
    rows.iter()
        .filter_map(|&i| table.cell(i, col).as_f64())
        .fold(0.0, |acc, v| acc + v)
}

// ---------------------------------------------------------------------------
// Per-city mean rent
// ---------------------------------------------------------------------------

/// One bar of the mean-rent chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CityMean {
    pub city: CellValue,
    /// `None` when no listing of the city carries a numeric rent.
    pub mean_rent: Option<f64>,
    /// Listings in the group, including those without a rent.
    pub listings: usize,
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
    listings: usize,
}

/// Group by city and average the rent column.
///
/// One record per distinct non-null city, in order of first appearance.
/// Returns `None` when the city or rent column is missing.
pub fn mean_rent_by_city(table: &ListingTable, columns: &ListingColumns) -> Option<Vec<CityMean>> {
    let city_col = table.column_index(&columns.city)?;
    let rent_col = table.column_index(&columns.rent)?;

    let mut order: Vec<&CellValue> = Vec::new();
    let mut groups: HashMap<&CellValue, Accumulator> = HashMap::new();

    for row in &table.rows {
        let city = &row[city_col];
        if city.is_null() {
            continue;
        }
        let acc = groups.entry(city).or_insert_with(|| {
            order.push(city);
            Accumulator::default()
        });
        acc.listings += 1;
        if let Some(rent) = row[rent_col].as_f64() {
            acc.sum += rent;
            acc.count += 1;
        }
    }

    let means = order
        .into_iter()
        .map(|city| {
            let acc = &groups[city];
            CityMean {
                city: city.clone(),
                mean_rent: (acc.count > 0).then(|| acc.sum / acc.count as f64),
                listings: acc.listings,
            }
        })
        .collect();
    Some(means)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn means_per_city_in_first_appearance_order() {
        let table =
            load_csv_bytes(b"city,rooms,rent amount (R$)\nSP,2,1000\nSP,3,2000\nRJ,2,1500\n").unwrap();
        let means = mean_rent_by_city(&table, &ListingColumns::default()).unwrap();
        assert_eq!(
            means,
            vec![
                CityMean { city: text("SP"), mean_rent: Some(1500.0), listings: 2 },
                CityMean { city: text("RJ"), mean_rent: Some(1500.0), listings: 1 },
            ]
        );
    }

    #[test]
    fn mean_is_sum_over_count_and_one_record_per_city() {
        let csv = b"city,rent amount (R$)\nSP,100\nBH,10\nSP,250\nPOA,7.5\nBH,20\nSP,30\n";
        let table = load_csv_bytes(csv).unwrap();
        let cols = ListingColumns::default();
        let means = mean_rent_by_city(&table, &cols).unwrap();

        let distinct = table.distinct_values(0);
        assert_eq!(means.len(), distinct.len());
        for m in &means {
            let rents: Vec<f64> = table
                .rows
                .iter()
                .filter(|r| r[0] == m.city)
                .filter_map(|r| r[1].as_f64())
                .collect();
            let expected = rents.iter().sum::<f64>() / rents.len() as f64;
            assert!((m.mean_rent.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_rents_are_skipped_and_null_cities_dropped() {
        let csv = b"city,rent amount (R$)\nSP,1000\nSP,\nRJ,\n,500\n";
        let table = load_csv_bytes(csv).unwrap();
        let means = mean_rent_by_city(&table, &ListingColumns::default()).unwrap();
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].mean_rent, Some(1000.0));
        assert_eq!(means[0].listings, 2);
        assert_eq!(means[1].mean_rent, None);
    }

    #[test]
    fn skipped_without_required_columns() {
        let table = load_csv_bytes(b"city,rooms\nSP,2\n").unwrap();
        assert_eq!(mean_rent_by_city(&table, &ListingColumns::default()), None);
    }

    #[test]
    fn sum_over_no_rows_is_zero() {
        let table = load_csv_bytes(b"rent amount (R$)\n10\n").unwrap();
        let empty = sum_numeric(&table, 0, &[]);
        assert_eq!(empty, 0.0);
        assert!(empty.is_sign_positive());
        assert_eq!(format!("{empty:.2}"), "0.00");
        assert_eq!(sum_numeric(&table, 0, &[0]), 10.0);
    }

    #[test]
    fn city_without_numeric_rent_totals_positive_zero() {
        let table = load_csv_bytes(b"city,rent amount (R$)\nSP,\nSP,NA\n").unwrap();
        let total = sum_numeric(&table, 1, &[0, 1]);
        assert!(total.is_sign_positive());
        assert_eq!(format!("{total:.2}"), "0.00");
    }
}
