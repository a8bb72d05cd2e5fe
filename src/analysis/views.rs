use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;

use crate::jump::event::Event;

/// Bucket key for events whose session carries no date.
pub const UNKNOWN_DATE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Group events by key. Groups appear in the order their key was first seen
/// and keep the input order of their events.
pub fn group_by<'a, K, F>(events: impl IntoIterator<Item = &'a Event>, mut key: F) -> Vec<(K, Vec<&'a Event>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Event) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a Event>)> = Vec::new();

    for event in events {
        let k = key(event);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(event),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![event]));
            }
        }
    }

    groups
}

pub fn group_by_tag<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<(String, Vec<&'a Event>)> {
    group_by(events, |e| e.tag.clone())
}

pub fn group_by_vehicle<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<(String, Vec<&'a Event>)> {
    group_by(events, |e| e.trackfile.session.vehicle_name.clone())
}

pub fn group_by_project<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<(String, Vec<&'a Event>)> {
    group_by(events, |e| e.trackfile.session.project_name.clone())
}

/// Buckets are ISO calendar dates (`2025-01-08`) or [`UNKNOWN_DATE`].
pub fn group_by_date<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<(String, Vec<&'a Event>)> {
    group_by(events, |e| match e.trackfile.session.date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => UNKNOWN_DATE.to_string(),
    })
}

/// Stable sort by session date, then frame id, both in `order`.
///
/// A missing date or frame id counts as larger than any present one, so
/// such events come last when ascending and first when descending.
pub fn sort_by_date_time<'a>(events: impl IntoIterator<Item = &'a Event>, order: SortOrder) -> Vec<&'a Event> {
    let mut sorted: Vec<&Event> = events.into_iter().collect();
    sorted.sort_by(|a, b| {
        let ord = missing_last(a.trackfile.session.date, b.trackfile.session.date)
            .then_with(|| missing_last(a.frame_id, b.frame_id));
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
    sorted
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct key values in first-occurrence order.
pub fn extract_unique<'a, K, F>(events: impl IntoIterator<Item = &'a Event>, mut key: F) -> Vec<K>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Event) -> K,
{
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for event in events {
        let k = key(event);
        if seen.insert(k.clone()) {
            values.push(k);
        }
    }
    values
}

pub fn filter_by<'a, P>(events: impl IntoIterator<Item = &'a Event>, mut predicate: P) -> Vec<&'a Event>
where
    P: FnMut(&Event) -> bool,
{
    events.into_iter().filter(|e| predicate(*e)).collect()
}

/// The predicates the dashboard filters events with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    Tag(String),
    Project(String),
    Vehicle(String),
    /// Inclusive on both ends. Events without a date never match.
    DateRange { from: NaiveDate, to: NaiveDate },
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        let session = &event.trackfile.session;
        match self {
            EventFilter::Tag(tag) => event.tag == *tag,
            EventFilter::Project(project) => session.project_name == *project,
            EventFilter::Vehicle(vehicle) => session.vehicle_name == *vehicle,
            EventFilter::DateRange { from, to } => {
                session.date.is_some_and(|d| d >= *from && d <= *to)
            }
        }
    }
}

/// Keep events matching every filter.
pub fn apply_filters<'a>(events: impl IntoIterator<Item = &'a Event>, filters: &[EventFilter]) -> Vec<&'a Event> {
    filter_by(events, |e| filters.iter().all(|f| f.matches(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jump::event::parse_event;

    fn events(lines: &[&str]) -> Vec<Event> {
        lines.iter().map(|l| parse_event(l).unwrap()).collect()
    }

    fn fixture() -> Vec<Event> {
        events(&[
            "SBS1_Wstn_250110_100000_0_s001_v_s60_1 main 30 car",
            "SBS1_Ostn_250108_090000_0_s001_v_s60_1 main 20 police",
            "nodate cam 5 car",
            "PRJ2_Wstn_250108_120000_0_s001_v_s60_2 main 10 car",
            "SBS1_Wstn_250110_100000_0_s001_v_s60_1 main 15 stop sign",
        ])
    }

    fn frames(events: &[&Event]) -> Vec<Option<i64>> {
        events.iter().map(|e| e.frame_id).collect()
    }

    #[test]
    fn test_group_by_tag_keeps_first_seen_order() {
        let evs = fixture();
        let groups = group_by_tag(&evs);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["car", "police", "stop sign"]);
        assert_eq!(frames(&groups[0].1), vec![Some(30), Some(5), Some(10)]);
    }

    #[test]
    fn test_group_by_vehicle_and_project() {
        let evs = fixture();
        let vehicles = group_by_vehicle(&evs);
        let keys: Vec<&str> = vehicles.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Wstn", "Ostn", ""]);
        assert_eq!(vehicles[0].1.len(), 3);

        let projects = group_by_project(&evs);
        let keys: Vec<&str> = projects.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["SBS1", "", "PRJ2"]);
    }

    #[test]
    fn test_group_by_date_uses_unknown_bucket() {
        let evs = fixture();
        let groups = group_by_date(&evs);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2025-01-10", "2025-01-08", UNKNOWN_DATE]);
        assert_eq!(groups[1].1.len(), 2);
    }

    #[test]
    fn test_sort_ascending_puts_missing_dates_last() {
        let evs = fixture();
        let sorted = sort_by_date_time(&evs, SortOrder::Ascending);
        assert_eq!(frames(&sorted), vec![Some(10), Some(20), Some(15), Some(30), Some(5)]);
    }

    #[test]
    fn test_sort_descending_puts_missing_dates_first() {
        let evs = fixture();
        let sorted = sort_by_date_time(&evs, SortOrder::Descending);
        assert_eq!(frames(&sorted), vec![Some(5), Some(30), Some(15), Some(20), Some(10)]);
    }

    #[test]
    fn test_sort_is_stable_for_full_ties() {
        let evs = events(&["a cam 1 first", "b cam 1 second", "c cam 1 third"]);
        let asc = sort_by_date_time(&evs, SortOrder::Ascending);
        let desc = sort_by_date_time(&evs, SortOrder::Descending);
        let tags = |v: &[&Event]| v.iter().map(|e| e.tag.clone()).collect::<Vec<_>>();
        assert_eq!(tags(&asc), vec!["first", "second", "third"]);
        assert_eq!(tags(&desc), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_extract_unique() {
        let evs = fixture();
        let tags = extract_unique(&evs, |e| e.tag.clone());
        assert_eq!(tags, vec!["car", "police", "stop sign"]);
        let dates = extract_unique(&evs, |e| e.trackfile.session.date);
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[2], None);
    }

    #[test]
    fn test_filters() {
        let evs = fixture();
        assert_eq!(frames(&apply_filters(&evs, &[EventFilter::Tag("car".into())])), vec![Some(30), Some(5), Some(10)]);
        assert_eq!(frames(&apply_filters(&evs, &[EventFilter::Project("PRJ2".into())])), vec![Some(10)]);
        assert_eq!(
            frames(&apply_filters(
                &evs,
                &[EventFilter::Vehicle("Wstn".into()), EventFilter::Tag("car".into())]
            )),
            vec![Some(30), Some(10)]
        );
    }

    #[test]
    fn test_date_range_is_inclusive_and_skips_missing_dates() {
        let evs = fixture();
        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        let range = EventFilter::DateRange { from: day(8), to: day(8) };
        assert_eq!(frames(&filter_by(&evs, |e| range.matches(e))), vec![Some(20), Some(10)]);

        let everything = EventFilter::DateRange { from: NaiveDate::MIN, to: NaiveDate::MAX };
        assert_eq!(filter_by(&evs, |e| everything.matches(e)).len(), 4);
    }
}
