use super::model::{ExportRecord, YearRange};

// ---------------------------------------------------------------------------
// Year-range filter
// ---------------------------------------------------------------------------

/// Return the records whose `year` falls inside the inclusive `range`,
/// preserving relative order.
///
/// The bounds are taken as-is: a range lying entirely outside the dataset's
/// year span simply yields an empty result. Clamping UI-supplied bounds into
/// the dataset domain is the caller's job ([`YearRange::clamp_to`]).
pub fn filter_by_years<'a>(records: &'a [ExportRecord], range: YearRange) -> Vec<&'a ExportRecord> {
    records
        .iter()
        .filter(|rec| range.contains(rec.year))
        .collect()
}
