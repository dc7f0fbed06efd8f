use crate::model::{Gender, Partition, StudentId, TutorialGroup};
use crate::scoring::{
    TOLERATED, Weights, average_cgpa, cgpa_variance, diversity_score, weighted_objective,
};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct TeamStats {
    pub size: usize,
    pub average_cgpa: Option<f64>,
    pub females: usize,
    pub males: usize,
    /// Some school provides more than two members.
    pub school_majority: bool,
    pub diversity: u32,
}

impl TeamStats {
    /// Gender composition such as `2F3M`.
    pub fn composition(&self) -> String {
        format!("{}F{}M", self.females, self.males)
    }

    pub fn is_single_gender(&self) -> bool {
        self.size > 1 && (self.females == 0 || self.males == 0)
    }
}

pub fn team_stats(group: &TutorialGroup, team: &[StudentId]) -> TeamStats {
    let females = team
        .iter()
        .filter(|&&s| group.gender(s) == Gender::Female)
        .count();
    let mut schools: HashMap<&str, usize> = HashMap::new();
    for &s in team {
        *schools.entry(group.school(s)).or_insert(0) += 1;
    }
    TeamStats {
        size: team.len(),
        average_cgpa: average_cgpa(group, team),
        females,
        males: team.len() - females,
        school_majority: schools.values().any(|&n| n > TOLERATED),
        diversity: diversity_score(group, team),
    }
}

#[derive(Clone, Debug)]
pub struct PartitionStats {
    pub teams: Vec<TeamStats>,
    pub diversity: u32,
    pub cgpa_variance: f64,
    pub objective: f64,
    pub school_majorities: usize,
    pub single_gender: usize,
}

pub fn statistics(
    group: &TutorialGroup,
    partition: &Partition,
    weights: Weights,
) -> PartitionStats {
    let teams = partition
        .teams
        .iter()
        .map(|team| team_stats(group, team))
        .collect::<Vec<_>>();
    PartitionStats {
        diversity: teams.iter().map(|t| t.diversity).sum(),
        cgpa_variance: cgpa_variance(group, partition),
        objective: weighted_objective(group, partition, weights),
        school_majorities: teams.iter().filter(|t| t.school_majority).count(),
        single_gender: teams.iter().filter(|t| t.is_single_gender()).count(),
        teams,
    }
}
