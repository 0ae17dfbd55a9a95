//! Turns accepted selections into display-ready lineups.

use crate::players::{CandidatePool, Role};
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedLineup {
    pub captains: Vec<String>,
    pub flex: Vec<String>,
    /// Sum of effective scores, rounded to two decimals.
    pub total_score: f64,
    pub total_salary: u32,
}

impl FinalizedLineup {
    /// Captain labels first, then flex labels, each in pool order.
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.captains.iter().chain(&self.flex).map(String::as_str)
    }

    /// Display record: player labels, then the score with two decimals, then the salary.
    pub fn slots(&self) -> Vec<String> {
        self.players()
            .map(str::to_string)
            .chain([format!("{:.2}", self.total_score), self.total_salary.to_string()])
            .collect()
    }
}

/// Half away from zero.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

pub fn finalize(selection: &Selection, pool: &CandidatePool) -> FinalizedLineup {
    let mut lineup = FinalizedLineup {
        captains: Vec::new(),
        flex: Vec::new(),
        total_score: 0.0,
        total_salary: 0,
    };
    let mut score = 0.0;
    for position in selection.positions() {
        let (role, candidate) = pool.candidate(position);
        match role {
            Role::Captain => lineup.captains.push(candidate.label.clone()),
            Role::Flex => lineup.flex.push(candidate.label.clone()),
        }
        score += candidate.effective_score;
        lineup.total_salary += candidate.salary;
    }
    lineup.total_score = round_score(score);
    lineup
}

/// Formats every selection, then orders by total salary, highest first. The sort is stable,
/// so equal salaries keep discovery order.
pub fn finalize_lineups(selections: &[Selection], pool: &CandidatePool) -> Vec<FinalizedLineup> {
    let mut lineups: Vec<FinalizedLineup> =
        selections.iter().map(|s| finalize(s, pool)).collect();
    rank_by_salary(&mut lineups);
    lineups
}

pub fn rank_by_salary(lineups: &mut [FinalizedLineup]) {
    lineups.sort_by(|left, right| right.total_salary.cmp(&left.total_salary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContestConfig;
    use crate::players::PlayerRecord;

    fn pool() -> CandidatePool {
        let players = vec![
            PlayerRecord::new("A", "A (1)", Role::Captain, 9000, Some(20.0)),
            PlayerRecord::new("B", "B (2)", Role::Captain, 8000, Some(18.0)),
            PlayerRecord::new("C", "C (3)", Role::Flex, 6000, Some(12.0)),
            PlayerRecord::new("D", "D (4)", Role::Flex, 5000, Some(10.0)),
            PlayerRecord::new("E", "E (5)", Role::Flex, 4000, Some(8.006)),
        ];
        let contest = ContestConfig {
            flex_slots: 2,
            ..ContestConfig::default()
        };
        CandidatePool::build(&players, &contest).unwrap()
    }

    #[test]
    fn captain_comes_first_and_totals_add_up() {
        let pool = pool();
        let lineup = finalize(&Selection::from_positions(&pool, [0, 2, 3]), &pool);

        assert_eq!(lineup.captains, vec!["A (1)"]);
        assert_eq!(lineup.flex, vec!["C (3)", "D (4)"]);
        assert_eq!(lineup.total_score, 52.0);
        assert_eq!(lineup.total_salary, 20_000);
        assert_eq!(
            lineup.slots(),
            vec!["A (1)", "C (3)", "D (4)", "52.00", "20000"]
        );
    }

    #[test]
    fn scores_round_to_two_decimals() {
        assert_eq!(round_score(1.234), 1.23);
        assert_eq!(round_score(-1.236), -1.24);
        assert_eq!(round_score(2.5), 2.5);

        let pool = pool();
        let lineup = finalize(&Selection::from_positions(&pool, [1, 3, 4]), &pool);
        // 27 + 10 + 8.006
        assert!((lineup.total_score - 45.01).abs() < 1e-9);
    }

    #[test]
    fn ranks_by_salary_not_score() {
        let pool = pool();
        let selections = vec![
            Selection::from_positions(&pool, [1, 3, 4]), // 17000
            Selection::from_positions(&pool, [0, 2, 3]), // 20000
            Selection::from_positions(&pool, [1, 2, 4]), // 18000
        ];
        let lineups = finalize_lineups(&selections, &pool);
        let salaries: Vec<u32> = lineups.iter().map(|l| l.total_salary).collect();
        assert_eq!(salaries, vec![20_000, 18_000, 17_000]);
    }

    #[test]
    fn equal_salaries_keep_discovery_order() {
        let pool = pool();
        let selections = vec![
            Selection::from_positions(&pool, [1, 2, 3]), // B C D: 19000
            Selection::from_positions(&pool, [0, 2, 4]), // A C E: 19000
            Selection::from_positions(&pool, [1, 3, 4]), // 17000
        ];
        let lineups = finalize_lineups(&selections, &pool);

        assert_eq!(lineups[0].captains, vec!["B (2)"]);
        assert_eq!(lineups[1].captains, vec!["A (1)"]);
        assert_eq!(lineups[2].total_salary, 17_000);
    }
}
