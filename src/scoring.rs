use crate::model::{Partition, StudentId, TutorialGroup};
use serde::Deserialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Number of members sharing a gender or a school that a team tolerates
/// before being penalized.
pub const TOLERATED: usize = 2;

/// Penalty for every member beyond the tolerated ones.
pub const PENALTY: u32 = 10;

/// Weights of the two objectives in the combined score.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Weights {
    pub diversity: f64,
    pub cgpa: f64,
}

impl Default for Weights {
    fn default() -> Weights {
        Weights {
            diversity: 0.70,
            cgpa: 0.30,
        }
    }
}

fn counts<K, I>(values: I) -> HashMap<K, usize>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

fn excess_penalty(counts: HashMap<impl Eq + Hash, usize>) -> u32 {
    counts
        .into_values()
        .map(|n| n.saturating_sub(TOLERATED) as u32 * PENALTY)
        .sum()
}

/// Penalty of a team lacking diversity (less is better, 0 is perfect).
/// Every gender or school shared by more than two members adds 10 per
/// extra member.
pub fn diversity_score(group: &TutorialGroup, team: &[StudentId]) -> u32 {
    let genders = counts(team.iter().map(|&s| group.gender(s)));
    let schools = counts(team.iter().map(|&s| group.school(s)));
    excess_penalty(genders) + excess_penalty(schools)
}

pub fn team_scores(group: &TutorialGroup, partition: &Partition) -> Vec<u32> {
    partition
        .teams
        .iter()
        .map(|team| diversity_score(group, team))
        .collect()
}

pub fn total_diversity(group: &TutorialGroup, partition: &Partition) -> u32 {
    team_scores(group, partition).into_iter().sum()
}

/// Average CGPA of a team, or `None` if the team is empty.
pub fn average_cgpa(group: &TutorialGroup, team: &[StudentId]) -> Option<f64> {
    if team.is_empty() {
        None
    } else {
        Some(team.iter().map(|&s| group.cgpa(s)).sum::<f64>() / team.len() as f64)
    }
}

/// Population variance of the teams' average CGPA. A partition without
/// teams or with an empty team has a variance of 0.
pub fn cgpa_variance(group: &TutorialGroup, partition: &Partition) -> f64 {
    let Some(averages) = partition
        .teams
        .iter()
        .map(|team| average_cgpa(group, team))
        .collect::<Option<Vec<_>>>()
    else {
        return 0.0;
    };
    if averages.is_empty() {
        return 0.0;
    }
    let n = averages.len() as f64;
    let mean = averages.iter().sum::<f64>() / n;
    averages.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n
}

pub fn weighted_objective(group: &TutorialGroup, partition: &Partition, weights: Weights) -> f64 {
    weights.diversity * f64::from(total_diversity(group, partition))
        + weights.cgpa * cgpa_variance(group, partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender::*, test_group};

    fn ids(range: std::ops::Range<usize>) -> Vec<StudentId> {
        range.map(StudentId).collect()
    }

    #[test]
    fn test_gender_majority() {
        let g = test_group(&[
            ("A", Male, 3.0),
            ("B", Male, 3.0),
            ("C", Male, 3.0),
            ("D", Female, 3.0),
            ("E", Female, 3.0),
        ]);
        assert_eq!(diversity_score(&g, &ids(0..5)), 10);
    }

    #[test]
    fn test_distinct_schools() {
        let g = test_group(&[
            ("A", Male, 3.0),
            ("B", Male, 3.0),
            ("C", Female, 3.0),
            ("D", Female, 3.0),
            ("E", Female, 3.0),
        ]);
        // Only the three women are penalized.
        assert_eq!(diversity_score(&g, &ids(0..5)), 10);
    }

    #[test]
    fn test_school_pair_is_tolerated() {
        let g = test_group(&[
            ("A", Male, 3.0),
            ("A", Female, 3.0),
            ("B", Male, 3.0),
            ("B", Female, 3.0),
        ]);
        assert_eq!(diversity_score(&g, &ids(0..4)), 0);
    }

    #[test]
    fn test_combined_penalties() {
        let g = test_group(&[
            ("A", Male, 3.0),
            ("A", Male, 3.0),
            ("A", Male, 3.0),
            ("A", Male, 3.0),
            ("B", Female, 3.0),
        ]);
        // Four men and four students from A: 20 + 20.
        assert_eq!(diversity_score(&g, &ids(0..5)), 40);
        assert_eq!(diversity_score(&g, &[]), 0);
    }

    #[test]
    fn test_cgpa_variance() {
        let g = test_group(&[
            ("A", Male, 2.0),
            ("B", Female, 4.0),
            ("C", Male, 4.0),
            ("D", Female, 4.0),
            ("E", Male, 5.0),
        ]);
        let p = Partition {
            teams: vec![ids(0..2), ids(2..4), ids(4..5)],
        };
        assert!((cgpa_variance(&g, &p) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_cgpa_variance_degenerate() {
        let g = test_group(&[("A", Male, 2.0), ("B", Female, 4.0)]);
        let p = Partition {
            teams: vec![ids(0..2), vec![]],
        };
        assert_eq!(cgpa_variance(&g, &p), 0.0);
        assert_eq!(cgpa_variance(&g, &Partition::new(0)), 0.0);
    }

    #[test]
    fn test_weighted_objective() {
        let g = test_group(&[
            ("A", Male, 2.0),
            ("A", Male, 2.0),
            ("A", Male, 2.0),
            ("B", Female, 4.0),
        ]);
        let p = Partition {
            teams: vec![ids(0..3), ids(3..4)],
        };
        // Diversity 20, variance 1.
        let expected = 0.7 * 20.0 + 0.3 * 1.0;
        assert!((weighted_objective(&g, &p, Weights::default()) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_scoring_is_pure() {
        let g = test_group(&[
            ("A", Male, 2.5),
            ("A", Male, 3.5),
            ("A", Male, 1.0),
            ("B", Female, 4.0),
        ]);
        let p = Partition {
            teams: vec![ids(0..3), ids(3..4)],
        };
        let before = p.clone();
        assert_eq!(total_diversity(&g, &p), total_diversity(&g, &p));
        assert_eq!(cgpa_variance(&g, &p), cgpa_variance(&g, &p));
        assert_eq!(p, before);
    }
}
