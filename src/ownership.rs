//! How often each player shows up as captain and as flex across a lineup set.

use std::collections::HashMap;

use crate::lineup::FinalizedLineup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipSummary {
    pub captain: Vec<Exposure>,
    pub flex: Vec<Exposure>,
    pub lineups: usize,
}

impl Exposure {
    pub fn share(&self, lineups: usize) -> f64 {
        if lineups == 0 {
            0.0
        } else {
            self.count as f64 / lineups as f64
        }
    }
}

/// Counts descending, ties by label.
pub fn summarize(lineups: &[FinalizedLineup]) -> OwnershipSummary {
    OwnershipSummary {
        captain: count(lineups.iter().flat_map(|l| &l.captains)),
        flex: count(lineups.iter().flat_map(|l| &l.flex)),
        lineups: lineups.len(),
    }
}

fn count<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<Exposure> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }
    let mut exposures: Vec<Exposure> = counts
        .into_iter()
        .map(|(label, count)| Exposure {
            label: label.to_string(),
            count,
        })
        .collect();
    exposures.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    exposures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineup(captain: &str, flex: &[&str]) -> FinalizedLineup {
        FinalizedLineup {
            captains: vec![captain.to_string()],
            flex: flex.iter().map(|f| f.to_string()).collect(),
            total_score: 0.0,
            total_salary: 0,
        }
    }

    #[test]
    fn counts_captain_and_flex_separately() {
        let lineups = vec![
            lineup("A", &["C", "D"]),
            lineup("B", &["C", "A"]),
            lineup("A", &["D", "C"]),
        ];
        let summary = summarize(&lineups);

        assert_eq!(summary.lineups, 3);
        assert_eq!(
            summary.captain,
            vec![
                Exposure { label: "A".to_string(), count: 2 },
                Exposure { label: "B".to_string(), count: 1 },
            ]
        );
        let flex: Vec<(&str, usize)> = summary
            .flex
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(flex, vec![("C", 3), ("D", 2), ("A", 1)]);
        assert!((summary.flex[0].share(3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_set_has_no_exposure() {
        let summary = summarize(&[]);
        assert!(summary.captain.is_empty());
        assert_eq!(Exposure { label: "A".to_string(), count: 0 }.share(0), 0.0);
    }
}
