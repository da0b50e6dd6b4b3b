use std::collections::{BTreeMap, HashMap, HashSet};

use super::model::{ExportField, ExportRecord};

// ---------------------------------------------------------------------------
// Scalar aggregations
// ---------------------------------------------------------------------------

/// Number of distinct non-empty country names.
pub fn distinct_country_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a ExportRecord>,
{
    records
        .into_iter()
        .filter(|r| !r.country.is_empty())
        .map(|r| r.country.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Total of the chosen field across all records. Missing cells contribute
/// nothing; an empty input sums to 0.
pub fn sum_field<'a, I>(records: I, field: ExportField) -> f64
where
    I: IntoIterator<Item = &'a ExportRecord>,
{
    records.into_iter().filter_map(|r| r.field(field)).sum()
}

// ---------------------------------------------------------------------------
// Per-country totals (insertion-ordered)
// ---------------------------------------------------------------------------

/// One country's summed field, tagged with its ISO3 code for the map join.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTotal {
    pub country: String,
    pub iso3: String,
    pub total: f64,
}

/// Per-country sums keyed by country name.
///
/// Entries keep the order in which each country was first encountered in the
/// input; [`top_n`] relies on that order to break ties deterministically.
#[derive(Debug, Clone, Default)]
pub struct CountryTotals {
    entries: Vec<CountryTotal>,
    index: HashMap<String, usize>,
}

impl CountryTotals {
    pub fn entries(&self) -> &[CountryTotal] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summed total for a country, if present.
    pub fn get(&self, country: &str) -> Option<f64> {
        self.index.get(country).map(|&i| self.entries[i].total)
    }

    fn add(&mut self, country: &str, iso3: &str, amount: f64) {
        match self.index.get(country) {
            Some(&i) => self.entries[i].total += amount,
            None => {
                self.index.insert(country.to_string(), self.entries.len());
                self.entries.push(CountryTotal {
                    country: country.to_string(),
                    iso3: iso3.to_string(),
                    total: amount,
                });
            }
        }
    }
}

/// Sum the chosen field per destination country.
///
/// Only complete rows participate: the result feeds the choropleth maps and
/// the rankings, which need a geographic join and fully populated cells.
pub fn group_sum_by_country<'a, I>(records: I, field: ExportField) -> CountryTotals
where
    I: IntoIterator<Item = &'a ExportRecord>,
{
    let mut totals = CountryTotals::default();
    for rec in records {
        if !rec.is_complete() {
            continue;
        }
        let (Some(iso3), Some(amount)) = (rec.iso3.as_deref(), rec.field(field)) else {
            continue;
        };
        totals.add(&rec.country, iso3, amount);
    }
    totals
}

/// The `n` largest totals in descending order.
///
/// Ties keep the first-encountered order of the grouped input (the sort is
/// stable). Fewer than `n` entries returns all of them.
pub fn top_n(totals: &CountryTotals, n: usize) -> Vec<CountryTotal> {
    let mut ranked = totals.entries().to_vec();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Per-year totals
// ---------------------------------------------------------------------------

/// Sum the chosen field per year, keyed ascending.
///
/// Every year present in the input appears in the result, even when all of
/// its cells are missing (sum 0) – matching how the source data treats blank
/// cells as zero-contribution rather than dropping the year.
pub fn group_sum_by_year<'a, I>(records: I, field: ExportField) -> BTreeMap<i32, f64>
where
    I: IntoIterator<Item = &'a ExportRecord>,
{
    let mut totals = BTreeMap::new();
    for rec in records {
        let entry = totals.entry(rec.year).or_insert(0.0);
        if let Some(amount) = rec.field(field) {
            *entry += amount;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_by_years;
    use crate::data::model::YearRange;

    fn record(year: i32, country: &str, iso3: Option<&str>, value: f64, weight: f64) -> ExportRecord {
        ExportRecord {
            year,
            country: country.to_string(),
            iso3: iso3.map(str::to_string),
            value_usd: Some(value),
            weight_kg: Some(weight),
        }
    }

    #[test]
    fn sum_of_empty_input_is_zero() {
        let empty: Vec<ExportRecord> = Vec::new();
        assert_eq!(sum_field(&empty, ExportField::Value), 0.0);
        assert_eq!(sum_field(&empty, ExportField::Weight), 0.0);
    }

    #[test]
    fn sum_over_year_partition_equals_total() {
        let records = vec![
            record(2010, "Japan", Some("JPN"), 200.0, 20.0),
            record(2011, "Japan", Some("JPN"), 75.0, 7.0),
            record(2010, "Germany", Some("DEU"), 40.0, 4.0),
            record(2012, "Germany", Some("DEU"), 10.0, 1.0),
        ];
        let total = sum_field(&records, ExportField::Value);
        let by_parts: f64 = (2010..=2012)
            .map(|y| {
                let part = filter_by_years(&records, YearRange::new(y, y));
                sum_field(part.iter().copied(), ExportField::Value)
            })
            .sum();
        assert_eq!(total, by_parts);
    }

    #[test]
    fn distinct_count_ignores_duplicate_rows() {
        let mut records = vec![
            record(2010, "Japan", Some("JPN"), 1.0, 1.0),
            record(2010, "Germany", Some("DEU"), 1.0, 1.0),
        ];
        assert_eq!(distinct_country_count(&records), 2);
        records.push(record(2011, "Japan", Some("JPN"), 5.0, 5.0));
        assert_eq!(distinct_country_count(&records), 2);
    }

    #[test]
    fn country_totals_sum_across_years() {
        let records = vec![
            record(2010, "United States", Some("USA"), 100.0, 10.0),
            record(2011, "United States", Some("USA"), 50.0, 5.0),
            record(2010, "Japan", Some("JPN"), 200.0, 20.0),
        ];
        let totals = group_sum_by_country(&records, ExportField::Value);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("United States"), Some(150.0));
        assert_eq!(totals.get("Japan"), Some(200.0));
        assert_eq!(totals.entries()[0].iso3, "USA");
    }

    #[test]
    fn incomplete_rows_skip_country_totals_but_not_year_totals() {
        let records = vec![
            record(2010, "Japan", Some("JPN"), 200.0, 20.0),
            record(2010, "Unknown", None, 35.0, 3.0),
        ];
        let by_country = group_sum_by_country(&records, ExportField::Value);
        assert_eq!(by_country.len(), 1);
        assert_eq!(by_country.get("Unknown"), None);

        let by_year = group_sum_by_year(&records, ExportField::Value);
        assert_eq!(by_year.get(&2010), Some(&235.0));
    }

    #[test]
    fn year_with_only_blank_cells_still_appears() {
        let mut blank = record(2012, "Japan", Some("JPN"), 0.0, 0.0);
        blank.value_usd = None;
        blank.weight_kg = None;
        let records = vec![record(2010, "Japan", Some("JPN"), 9.0, 1.0), blank];
        let by_year = group_sum_by_year(&records, ExportField::Value);
        assert_eq!(by_year.get(&2012), Some(&0.0));
        assert_eq!(by_year.len(), 2);
    }

    #[test]
    fn top_n_orders_descending_and_caps_at_n() {
        let records = vec![
            record(2010, "Germany", Some("DEU"), 40.0, 4.0),
            record(2010, "Japan", Some("JPN"), 200.0, 20.0),
            record(2010, "United States", Some("USA"), 100.0, 10.0),
        ];
        let totals = group_sum_by_country(&records, ExportField::Value);

        let top2 = top_n(&totals, 2);
        assert_eq!(top2.len(), 2);
        assert_eq!(top2[0].country, "Japan");
        assert_eq!(top2[1].country, "United States");

        // Fewer distinct keys than n: all of them come back.
        let top10 = top_n(&totals, 10);
        assert_eq!(top10.len(), 3);
        assert!(top10.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn top_n_breaks_ties_by_first_encounter() {
        let records = vec![
            record(2010, "Germany", Some("DEU"), 100.0, 1.0),
            record(2010, "Japan", Some("JPN"), 100.0, 1.0),
            record(2010, "Malaysia", Some("MYS"), 100.0, 1.0),
        ];
        let totals = group_sum_by_country(&records, ExportField::Value);
        let ranked = top_n(&totals, 3);
        let order: Vec<&str> = ranked.iter().map(|t| t.country.as_str()).collect();
        assert_eq!(order, vec!["Germany", "Japan", "Malaysia"]);
    }

    #[test]
    fn filtered_single_year_scenario() {
        let records = vec![
            record(2010, "United States", Some("USA"), 100.0, 10.0),
            record(2011, "United States", Some("USA"), 50.0, 5.0),
            record(2010, "Japan", Some("JPN"), 200.0, 20.0),
        ];
        let filtered = filter_by_years(&records, YearRange::new(2010, 2010));
        assert_eq!(filtered.len(), 2);

        let totals = group_sum_by_country(filtered.iter().copied(), ExportField::Value);
        assert_eq!(totals.get("United States"), Some(100.0));
        assert_eq!(totals.get("Japan"), Some(200.0));

        let top = top_n(&totals, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].country, "Japan");
        assert_eq!(top[0].total, 200.0);
    }
}
