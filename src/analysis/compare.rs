use std::collections::BTreeMap;

use serde::Serialize;

use super::summary::DatasetSummary;
use crate::error::{Error, Result};

/// Side-by-side view of several datasets.
#[derive(Debug, Serialize)]
pub struct Comparison {
    pub datasets: Vec<String>,
    pub common_tags: Vec<String>,
    pub unique_tags: BTreeMap<String, Vec<String>>,
    pub stats: Vec<DatasetSummary>,
}

/// Tags present in every summary, in the first summary's key order.
pub fn find_common_tags(summaries: &[DatasetSummary]) -> Vec<String> {
    let Some((first, rest)) = summaries.split_first() else {
        return Vec::new();
    };

    first
        .tag_counts
        .keys()
        .filter(|tag| rest.iter().all(|s| s.tag_counts.contains_key(*tag)))
        .cloned()
        .collect()
}

/// For each dataset, the tags no other dataset has.
///
/// With three or more datasets this is stricter than "not common": a tag
/// shared by two of three datasets is unique to neither.
pub fn find_unique_tags(summaries: &[DatasetSummary]) -> BTreeMap<String, Vec<String>> {
    let mut unique = BTreeMap::new();

    for (i, summary) in summaries.iter().enumerate() {
        let tags: Vec<String> = summary
            .tag_counts
            .keys()
            .filter(|tag| {
                !summaries
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && other.tag_counts.contains_key(*tag))
            })
            .cloned()
            .collect();
        unique.insert(summary.dataco_number.clone(), tags);
    }

    unique
}

pub fn compare(summaries: Vec<DatasetSummary>) -> Result<Comparison> {
    if summaries.len() < 2 {
        return Err(Error::NotEnoughDatasets {
            operation: "compare",
            found: summaries.len(),
        });
    }

    let comparison = Comparison {
        datasets: summaries.iter().map(|s| s.dataco_number.clone()).collect(),
        common_tags: find_common_tags(&summaries),
        unique_tags: find_unique_tags(&summaries),
        stats: summaries,
    };

    tracing::debug!(
        datasets = comparison.datasets.len(),
        common = comparison.common_tags.len(),
        "comparison complete"
    );
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, tags: &[(&str, u64)]) -> DatasetSummary {
        DatasetSummary {
            dataco_number: id.to_string(),
            unique_tags: tags.len() as u64,
            tag_counts: tags.iter().map(|(t, c)| (t.to_string(), *c)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_common_tags_edge_cases() {
        assert!(find_common_tags(&[]).is_empty());

        let disjoint = [summary("A", &[("a", 1)]), summary("B", &[("b", 1)])];
        assert!(find_common_tags(&disjoint).is_empty());

        let single = [summary("A", &[("b", 1), ("a", 2)])];
        assert_eq!(find_common_tags(&single), vec!["a", "b"]);
    }

    #[test]
    fn test_common_tags_shared() {
        let sets = [
            summary("A", &[("X", 1), ("y", 1)]),
            summary("B", &[("X", 5), ("z", 1)]),
            summary("C", &[("X", 2), ("y", 3)]),
        ];
        assert_eq!(find_common_tags(&sets), vec!["X"]);
    }

    #[test]
    fn test_unique_tags_excludes_pairwise_shared() {
        let sets = [
            summary("A", &[("all", 1), ("ab", 1), ("only_a", 1)]),
            summary("B", &[("all", 1), ("ab", 1)]),
            summary("C", &[("all", 1), ("only_c", 1)]),
        ];
        let unique = find_unique_tags(&sets);
        assert_eq!(unique["A"], vec!["only_a"]);
        assert!(unique["B"].is_empty());
        assert_eq!(unique["C"], vec!["only_c"]);
    }

    #[test]
    fn test_car_stop_sign_pedestrian_scenario() {
        let a = summary("A", &[("car", 3), ("stop_sign", 2)]);
        let b = summary("B", &[("car", 1), ("pedestrian", 4)]);
        let sets = [a, b];
        assert_eq!(find_common_tags(&sets), vec!["car"]);
        let unique = find_unique_tags(&sets);
        assert_eq!(unique["A"], vec!["stop_sign"]);
        assert_eq!(unique["B"], vec!["pedestrian"]);
    }

    #[test]
    fn test_compare_requires_two_datasets() {
        let err = compare(vec![summary("A", &[])]).unwrap_err();
        assert!(matches!(err, Error::NotEnoughDatasets { operation: "compare", found: 1 }));
        assert!(err.to_string().contains("need at least two datasets"));
    }

    #[test]
    fn test_compare_bundles_views() {
        let comparison = compare(vec![
            summary("A", &[("car", 3), ("stop_sign", 2)]),
            summary("B", &[("car", 1)]),
        ])
        .unwrap();
        assert_eq!(comparison.datasets, vec!["A", "B"]);
        assert_eq!(comparison.common_tags, vec!["car"]);
        assert_eq!(comparison.stats.len(), 2);

        let json = serde_json::to_value(&comparison).unwrap();
        assert_eq!(json["unique_tags"]["A"][0], "stop_sign");
    }
}
