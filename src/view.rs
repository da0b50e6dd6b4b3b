use crate::data::aggregate::{
    distinct_country_count, group_sum_by_country, group_sum_by_year, sum_field, top_n,
    CountryTotal,
};
use crate::data::filter::filter_by_years;
use crate::data::model::{ExportDataset, ExportField, YearRange};

/// How many countries the ranked bar charts show.
pub const TOP_COUNTRIES: usize = 10;

// ---------------------------------------------------------------------------
// ViewModel – everything the charts need for one rendering pass
// ---------------------------------------------------------------------------

/// Headline figures for the metric cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub destination_countries: usize,
    pub total_value_usd: f64,
    pub total_weight_kg: f64,
}

/// One country on a choropleth map.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethEntry {
    pub iso3: String,
    pub country: String,
    pub value: f64,
}

/// One point of an annual trend series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub value: f64,
}

/// All derived tables for one rendering pass.
///
/// Rebuilt from scratch on every filter interaction and discarded on the
/// next; nothing here survives a filter change.
#[derive(Debug, Clone)]
pub struct ViewModel {
    /// Year range the view was built with (clamped into the dataset span).
    pub year_range: YearRange,
    /// How many rows passed the year filter.
    pub filtered_records: usize,
    pub metrics: Metrics,
    /// Per-country value sums for the value map, first-encounter order.
    pub value_by_country: Vec<ChoroplethEntry>,
    /// Per-country weight sums for the weight map.
    pub weight_by_country: Vec<ChoroplethEntry>,
    /// Top countries by value, descending, ready for the ranked bars.
    pub top_value: Vec<CountryTotal>,
    /// Top countries by weight, descending.
    pub top_weight: Vec<CountryTotal>,
    /// Annual value totals, year ascending.
    pub annual_value: Vec<TrendPoint>,
    /// Annual weight totals, year ascending.
    pub annual_weight: Vec<TrendPoint>,
}

// ---------------------------------------------------------------------------
// The pipeline: filter → aggregate → chart tables
// ---------------------------------------------------------------------------

/// Build the complete view for one interaction.
///
/// Out-of-domain bounds are clamped into the dataset's year span rather than
/// rejected. The annual trend series are intentionally computed over the FULL
/// dataset: the year slider narrows the metrics, maps and rankings, while the
/// trend charts always show the complete history.
pub fn build_view(dataset: &ExportDataset, range: YearRange) -> ViewModel {
    let range = range.clamp_to(dataset.year_span);
    let filtered = filter_by_years(&dataset.records, range);

    let metrics = Metrics {
        destination_countries: distinct_country_count(filtered.iter().copied()),
        total_value_usd: sum_field(filtered.iter().copied(), ExportField::Value),
        total_weight_kg: sum_field(filtered.iter().copied(), ExportField::Weight),
    };

    let value_totals = group_sum_by_country(filtered.iter().copied(), ExportField::Value);
    let weight_totals = group_sum_by_country(filtered.iter().copied(), ExportField::Weight);

    let top_value = top_n(&value_totals, TOP_COUNTRIES);
    let top_weight = top_n(&weight_totals, TOP_COUNTRIES);

    let to_map_entries = |totals: &[CountryTotal]| -> Vec<ChoroplethEntry> {
        totals
            .iter()
            .map(|t| ChoroplethEntry {
                iso3: t.iso3.clone(),
                country: t.country.clone(),
                value: t.total,
            })
            .collect()
    };
    let value_by_country = to_map_entries(value_totals.entries());
    let weight_by_country = to_map_entries(weight_totals.entries());

    let to_trend = |field: ExportField| -> Vec<TrendPoint> {
        group_sum_by_year(&dataset.records, field)
            .into_iter()
            .map(|(year, value)| TrendPoint { year, value })
            .collect()
    };
    let annual_value = to_trend(ExportField::Value);
    let annual_weight = to_trend(ExportField::Weight);

    ViewModel {
        year_range: range,
        filtered_records: filtered.len(),
        metrics,
        value_by_country,
        weight_by_country,
        top_value,
        top_weight,
        annual_value,
        annual_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ExportRecord;

    fn record(year: i32, country: &str, iso3: Option<&str>, value: f64, weight: f64) -> ExportRecord {
        ExportRecord {
            year,
            country: country.to_string(),
            iso3: iso3.map(str::to_string),
            value_usd: Some(value),
            weight_kg: Some(weight),
        }
    }

    fn dataset() -> ExportDataset {
        ExportDataset::from_records(vec![
            record(2010, "United States", Some("USA"), 100.0, 10.0),
            record(2011, "United States", Some("USA"), 50.0, 5.0),
            record(2010, "Japan", Some("JPN"), 200.0, 20.0),
            record(2012, "Unknown", None, 30.0, 3.0),
        ])
    }

    #[test]
    fn metrics_cover_the_filtered_rows_including_incomplete_ones() {
        let view = build_view(&dataset(), YearRange::new(2012, 2012));
        // The incomplete row is still a row: it counts and it sums.
        assert_eq!(view.metrics.destination_countries, 1);
        assert_eq!(view.metrics.total_value_usd, 30.0);
        assert_eq!(view.metrics.total_weight_kg, 3.0);
        // But it has no ISO3 code, so the geographic views skip it.
        assert!(view.value_by_country.is_empty());
        assert!(view.top_value.is_empty());
    }

    #[test]
    fn trend_series_ignore_the_year_filter() {
        let view = build_view(&dataset(), YearRange::new(2010, 2010));
        let years: Vec<i32> = view.annual_value.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2010, 2011, 2012]);
        assert_eq!(view.annual_value[0].value, 300.0);
        assert_eq!(view.annual_value[1].value, 50.0);
        assert_eq!(view.annual_value[2].value, 30.0);
        let weight_years: Vec<i32> = view.annual_weight.iter().map(|p| p.year).collect();
        assert_eq!(weight_years, years);
    }

    #[test]
    fn filtered_views_honor_the_year_range() {
        let view = build_view(&dataset(), YearRange::new(2010, 2010));
        assert_eq!(view.filtered_records, 2);
        assert_eq!(view.metrics.destination_countries, 2);
        assert_eq!(view.metrics.total_value_usd, 300.0);
        assert_eq!(view.value_by_country.len(), 2);
        assert_eq!(view.top_value[0].country, "Japan");
        assert_eq!(view.top_value[0].total, 200.0);
    }

    #[test]
    fn out_of_domain_range_is_clamped_not_rejected() {
        let view = build_view(&dataset(), YearRange::new(1990, 2050));
        assert_eq!(view.year_range, YearRange::new(2010, 2012));
        assert_eq!(view.metrics.total_value_usd, 380.0);
    }

    #[test]
    fn top_lists_are_sorted_and_capped() {
        let view = build_view(&dataset(), YearRange::new(2010, 2012));
        assert!(view.top_value.len() <= TOP_COUNTRIES);
        assert!(view
            .top_value
            .windows(2)
            .all(|w| w[0].total >= w[1].total));
        assert_eq!(view.top_value[0].country, "Japan");
        assert_eq!(view.top_value[1].total, 150.0);
    }

    #[test]
    fn map_entries_carry_iso3_codes() {
        let view = build_view(&dataset(), YearRange::new(2010, 2012));
        let usa = view
            .value_by_country
            .iter()
            .find(|e| e.iso3 == "USA")
            .unwrap();
        assert_eq!(usa.country, "United States");
        assert_eq!(usa.value, 150.0);
    }
}
