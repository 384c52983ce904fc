use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use domain::Snapshot;

/// Snapshots ordered oldest first. Built only through [`normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySeries {
    entries: Vec<Snapshot>,
}

impl HistorySeries {
    pub fn first(&self) -> Option<&Snapshot> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.entries
    }

    /// Last `count` entries, newest first.
    pub fn recent(&self, count: usize) -> Vec<Snapshot> {
        self.entries.iter().rev().take(count).cloned().collect()
    }
}

/// Orders `history` ascending by timestamp. Entries whose timestamp is
/// missing or unreadable sort as epoch zero; ties keep their input order.
pub fn normalize(history: Option<&[Snapshot]>) -> HistorySeries {
    let Some(history) = history else {
        return HistorySeries::default();
    };

    let mut keyed: Vec<(i64, &Snapshot)> = history
        .iter()
        .map(|entry| (sort_key(entry), entry))
        .collect();
    // sort_by_key is stable
    keyed.sort_by_key(|(key, _)| *key);

    HistorySeries {
        entries: keyed.into_iter().map(|(_, entry)| entry.clone()).collect(),
    }
}

/// Epoch milliseconds of the entry's timestamp, `0` when absent or invalid.
pub fn sort_key(entry: &Snapshot) -> i64 {
    entry
        .timestamp
        .as_deref()
        .and_then(parse_timestamp)
        .map(|ts| ts.timestamp_millis())
        .unwrap_or(0)
}

/// Accepts RFC 3339, RFC 2822, ISO 8601 date-times with minute or second
/// precision (with or without an offset or `Z`) and plain dates. Anything
/// else, including locale formats a browser might still read, is rejected.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    // A trailing `Z` and no offset at all both mean UTC.
    let naive_part = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_part, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: Option<&str>, total: f64) -> Snapshot {
        Snapshot {
            timestamp: timestamp.map(str::to_string),
            total_value_usd: Some(total),
            daily_pnl: None,
            open_positions: None,
        }
    }

    fn totals(series: &HistorySeries) -> Vec<f64> {
        series
            .iter()
            .map(|e| e.total_value_usd.unwrap_or_default())
            .collect()
    }

    fn mixed_history() -> Vec<Snapshot> {
        vec![
            entry(Some("2024-01-03T00:00:00Z"), 3.0),
            entry(None, 0.5),
            entry(Some("2024-01-01"), 1.0),
            entry(Some("not a date"), 0.6),
            entry(Some("2024-01-02T12:00:00+02:00"), 2.0),
            entry(Some("2024-01-02 23:00:00"), 2.5),
        ]
    }

    #[test]
    fn absent_history_is_empty() {
        let series = normalize(None);
        assert!(series.is_empty());
        assert!(series.first().is_none());
        assert!(series.last().is_none());
    }

    #[test]
    fn orders_by_parsed_timestamp_with_invalid_first() {
        let history = mixed_history();
        let series = normalize(Some(&history));
        assert_eq!(totals(&series), vec![0.5, 0.6, 1.0, 2.0, 2.5, 3.0]);
        assert_eq!(series.first().map(|e| e.timestamp.clone()), Some(None));
        assert_eq!(
            series.last().and_then(|e| e.timestamp.clone()).as_deref(),
            Some("2024-01-03T00:00:00Z")
        );
    }

    #[test]
    fn output_is_sorted_permutation_of_input() {
        let history = mixed_history();
        let series = normalize(Some(&history));
        assert_eq!(series.len(), history.len());

        let keys: Vec<i64> = series.iter().map(sort_key).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));

        for original in &history {
            let expected = history.iter().filter(|e| *e == original).count();
            let found = series.iter().filter(|e| *e == original).count();
            assert_eq!(expected, found);
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let history = vec![
            entry(Some("2024-05-01T00:00:00Z"), 1.0),
            entry(None, 2.0),
            entry(Some("2024-05-01T00:00:00Z"), 3.0),
            entry(Some("garbage"), 4.0),
            entry(Some("2024-05-01T00:00:00Z"), 5.0),
        ];
        let series = normalize(Some(&history));
        assert_eq!(totals(&series), vec![2.0, 4.0, 1.0, 3.0, 5.0]);
    }

    #[test]
    fn normalize_is_idempotent_and_leaves_input_alone() {
        let history = mixed_history();
        let snapshot_before = history.clone();
        let once = normalize(Some(&history));
        let twice = normalize(Some(once.as_slice()));
        assert_eq!(once, twice);
        assert_eq!(history, snapshot_before);
    }

    #[test]
    fn recent_returns_newest_first() {
        let history: Vec<Snapshot> = (1..=7)
            .map(|day| entry(Some(format!("2024-02-0{day}").as_str()), day as f64))
            .collect();
        let series = normalize(Some(&history));
        let recent = series.recent(5);
        let values: Vec<f64> = recent
            .iter()
            .map(|e| e.total_value_usd.unwrap_or_default())
            .collect();
        assert_eq!(values, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
        assert_eq!(normalize(None).recent(5).len(), 0);
    }

    #[test]
    fn sort_key_reads_known_formats() {
        assert_eq!(sort_key(&entry(Some("1970-01-01T00:00:01Z"), 0.0)), 1_000);
        assert_eq!(sort_key(&entry(Some("1970-01-02"), 0.0)), 86_400_000);
        assert_eq!(
            sort_key(&entry(Some("1970-01-01T00:00:00.250"), 0.0)),
            250
        );
        assert_eq!(sort_key(&entry(Some("1970-01-01T00:01Z"), 0.0)), 60_000);
        assert_eq!(
            sort_key(&entry(Some("1970-01-01T02:01+02:00"), 0.0)),
            60_000
        );
        assert_eq!(
            sort_key(&entry(Some("Thu, 01 Jan 1970 00:00:02 +0000"), 0.0)),
            2_000
        );
        assert_eq!(sort_key(&entry(Some(""), 0.0)), 0);
        assert_eq!(sort_key(&entry(None, 0.0)), 0);
    }
}
