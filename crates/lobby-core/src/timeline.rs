//! Date-grouped timeline derivation.
//!
//! Input is expected newest-first (the fetch layer sorts). Grouping is a
//! single stable pass: groups appear in the order their date is first seen
//! and documents keep their input order inside a group. Documents without a
//! timestamp, or with a zero timestamp, are dropped.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::models::Timestamped;

/// `toDateString`-style key, e.g. `Sat Jan 02 2021`
const DATE_KEY_FORMAT: &str = "%a %b %d %Y";
/// Long English label, e.g. `Saturday, January 2, 2021`
const DATE_LABEL_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGroup<T> {
    pub date_key: String,
    pub date: NaiveDate,
    pub documents: Vec<T>,
}

impl<T> TimelineGroup<T> {
    /// Heading shown above the group.
    pub fn label(&self) -> String {
        self.date.format(DATE_LABEL_FORMAT).to_string()
    }
}

/// Calendar date of a microsecond timestamp in `tz`.
pub fn date_of<Tz: TimeZone>(timestamp_micros: u64, tz: &Tz) -> Option<NaiveDate> {
    let micros = i64::try_from(timestamp_micros).ok()?;
    let utc = DateTime::from_timestamp_micros(micros)?;
    Some(utc.with_timezone(tz).date_naive())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Long label for a group key produced by [`date_key`]. `None` when the key
/// does not parse.
pub fn date_label(key: &str) -> Option<String> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .ok()
        .map(|date| date.format(DATE_LABEL_FORMAT).to_string())
}

pub fn group_by_date<T, Tz, I>(documents: I, tz: &Tz) -> Vec<TimelineGroup<T>>
where
    T: Timestamped,
    Tz: TimeZone,
    I: IntoIterator<Item = T>,
{
    let mut groups: Vec<TimelineGroup<T>> = Vec::new();
    let mut index_by_date: HashMap<NaiveDate, usize> = HashMap::new();

    for doc in documents {
        let Some(timestamp) = doc.timestamp_micros().filter(|&ts| ts != 0) else {
            continue;
        };
        let Some(date) = date_of(timestamp, tz) else {
            tracing::debug!("dropping document with out-of-range timestamp {}", timestamp);
            continue;
        };

        let idx = *index_by_date.entry(date).or_insert_with(|| {
            groups.push(TimelineGroup {
                date_key: date_key(date),
                date,
                documents: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].documents.push(doc);
    }

    groups
}

/// [`group_by_date`] in the machine's local time zone.
pub fn group_by_local_date<T, I>(documents: I) -> Vec<TimelineGroup<T>>
where
    T: Timestamped,
    I: IntoIterator<Item = T>,
{
    group_by_date(documents, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use chrono::{FixedOffset, Utc};

    fn micros(rfc3339: &str) -> u64 {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .timestamp_micros() as u64
    }

    fn docs() -> Vec<Document> {
        vec![
            Document::new("a", Some(micros("2021-01-02T10:00:00Z"))),
            Document::new("undated", None),
            Document::new("b", Some(micros("2021-01-02T09:00:00Z"))),
            Document::new("c", Some(micros("2021-01-01T23:00:00Z"))),
        ]
    }

    fn ids(group: &TimelineGroup<Document>) -> Vec<&str> {
        group.documents.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_groups_newest_date_first_and_drops_undated() {
        let groups = group_by_date(docs(), &Utc);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date_key, "Sat Jan 02 2021");
        assert_eq!(ids(&groups[0]), vec!["a", "b"]);
        assert_eq!(groups[1].date_key, "Fri Jan 01 2021");
        assert_eq!(ids(&groups[1]), vec!["c"]);
    }

    #[test]
    fn test_group_order_follows_first_seen_key() {
        let input = vec![
            Document::new("x", Some(micros("2021-01-01T12:00:00Z"))),
            Document::new("y", Some(micros("2021-03-05T12:00:00Z"))),
            Document::new("z", Some(micros("2021-01-01T08:00:00Z"))),
        ];
        let groups = group_by_date(input, &Utc);

        assert_eq!(groups[0].date_key, "Fri Jan 01 2021");
        assert_eq!(ids(&groups[0]), vec!["x", "z"]);
        assert_eq!(groups[1].date_key, "Fri Mar 05 2021");
    }

    #[test]
    fn test_time_zone_moves_day_boundary() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let groups = group_by_date(docs(), &plus_two);

        // 23:00Z on the 1st is 01:00 on the 2nd at +02:00
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_grouping_borrowed_documents() {
        let owned = docs();
        let groups = group_by_date(owned.iter(), &Utc);
        assert_eq!(groups[0].documents[0].id, "a");
    }

    #[test]
    fn test_empty_and_all_undated() {
        assert!(group_by_date(Vec::<Document>::new(), &Utc).is_empty());
        assert!(group_by_date(vec![Document::new("u", None)], &Utc).is_empty());
    }

    #[test]
    fn test_zero_timestamp_counts_as_undated() {
        let input = vec![
            Document::new("zero", Some(0)),
            Document::new("one", Some(1)),
        ];
        let groups = group_by_date(input, &Utc);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].date_key, "Thu Jan 01 1970");
        assert_eq!(ids(&groups[0]), vec!["one"]);
    }

    #[test]
    fn test_out_of_range_timestamp_is_dropped() {
        let groups = group_by_date(vec![Document::new("far", Some(u64::MAX))], &Utc);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_labels_are_exact() {
        let groups = group_by_date(docs(), &Utc);
        assert_eq!(groups[0].label(), "Saturday, January 2, 2021");
        assert_eq!(groups[1].label(), "Friday, January 1, 2021");

        assert_eq!(
            date_label("Sat Jan 02 2021").as_deref(),
            Some("Saturday, January 2, 2021")
        );
        assert_eq!(
            date_label("Wed Dec 31 1969").as_deref(),
            Some("Wednesday, December 31, 1969")
        );
        assert_eq!(date_label("yesterday"), None);
    }

    #[test]
    fn test_date_key_pads_day() {
        let date = NaiveDate::from_ymd_opt(2020, 11, 3).unwrap();
        assert_eq!(date_key(date), "Tue Nov 03 2020");
    }
}
