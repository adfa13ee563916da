// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw attribution report model.
//!
//! Reports arrive as CSV with one header row; the header is excluded
//! from every count. Rows are ragged in practice, so parsing runs in
//! flexible mode and skips records that fail to decode.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Timestamp column of an installs report.
pub const INSTALL_TIME_COLUMN: usize = 1;

/// Timestamp column of an in-app-events report.
pub const EVENT_TIME_COLUMN: usize = 3;

/// A parsed raw report: the records after the header row.
#[derive(Debug, Clone)]
pub struct RawDataset {
    records: Vec<csv::StringRecord>,
}

impl RawDataset {
    /// Parse raw CSV bytes. An empty body yields an empty dataset.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(bytes);
        let records = reader.records().filter_map(Result::ok).collect();
        Self { records }
    }

    /// Number of data records (header excluded).
    pub fn record_count(&self) -> u64 {
        self.records.len() as u64
    }

    /// Count records per calendar date, taking the date as the text
    /// before the first space of the given column. Records with a
    /// missing column or an unparseable date are skipped; only dates
    /// with at least one record appear.
    pub fn bucket_by_date(&self, column: usize) -> BTreeMap<NaiveDate, u64> {
        let mut buckets = BTreeMap::new();
        for record in &self.records {
            let Some(field) = record.get(column) else {
                continue;
            };
            let date_part = field.trim().split(' ').next().unwrap_or("");
            if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                *buckets.entry(date).or_insert(0) += 1;
            }
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTALLS_CSV: &str = "\
app_id,install_time,media_source
com.x,2024-01-01 10:00:00,facebook
com.x,2024-01-01 11:30:00,google_ads
com.x,2024-01-01 23:59:59,facebook
com.x,2024-01-03 08:00:00,facebook
";

    #[test]
    fn record_count_excludes_header() {
        let dataset = RawDataset::parse(INSTALLS_CSV.as_bytes());
        assert_eq!(dataset.record_count(), 4);
    }

    #[test]
    fn empty_body_yields_zero_records() {
        assert_eq!(RawDataset::parse(b"").record_count(), 0);
        // A lone header row also counts as zero records.
        assert_eq!(RawDataset::parse(b"a,b,c\n").record_count(), 0);
    }

    #[test]
    fn bucket_by_date_counts_per_day_and_skips_gaps() {
        let dataset = RawDataset::parse(INSTALLS_CSV.as_bytes());
        let buckets = dataset.bucket_by_date(INSTALL_TIME_COLUMN);

        let jan1 = NaiveDate::parse_from_str("2024-01-01", "%Y-%m-%d").unwrap();
        let jan2 = NaiveDate::parse_from_str("2024-01-02", "%Y-%m-%d").unwrap();
        let jan3 = NaiveDate::parse_from_str("2024-01-03", "%Y-%m-%d").unwrap();

        assert_eq!(buckets.get(&jan1), Some(&3));
        assert_eq!(buckets.get(&jan2), None);
        assert_eq!(buckets.get(&jan3), Some(&1));
    }

    #[test]
    fn bucket_by_date_skips_malformed_timestamps_and_short_rows() {
        let csv = "\
a,b,c,event_time
1,2,3,2024-05-01 09:00:00
1,2,3,not-a-date
short,row
1,2,3,2024-05-01 10:00:00
";
        let dataset = RawDataset::parse(csv.as_bytes());
        let buckets = dataset.bucket_by_date(EVENT_TIME_COLUMN);
        let may1 = NaiveDate::parse_from_str("2024-05-01", "%Y-%m-%d").unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get(&may1), Some(&2));
    }

    #[test]
    fn date_only_fields_without_time_part_still_bucket() {
        let csv = "a,install_time\n1,2024-07-15\n";
        let dataset = RawDataset::parse(csv.as_bytes());
        let buckets = dataset.bucket_by_date(INSTALL_TIME_COLUMN);
        assert_eq!(buckets.len(), 1);
    }
}
