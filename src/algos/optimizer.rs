use crate::model::{Partition, TeamIndex, TutorialGroup};
use crate::scoring::{
    Weights, cgpa_variance, diversity_score, team_scores, total_diversity, weighted_objective,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};

/// Below this CGPA variance, a weighted optimization with no diversity
/// penalty left is considered done.
const VARIANCE_TOLERANCE: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Objective {
    /// Only the diversity penalty counts.
    Diversity,
    /// Weighted sum of the diversity penalty and of the CGPA variance.
    Weighted(Weights),
}

impl Objective {
    pub fn default_max_iterations(self) -> usize {
        match self {
            Objective::Diversity => 500,
            Objective::Weighted(_) => 50,
        }
    }

    /// Value tracked by the optimizer for the partition as a whole.
    pub fn score(self, group: &TutorialGroup, partition: &Partition) -> f64 {
        match self {
            Objective::Diversity => f64::from(total_diversity(group, partition)),
            Objective::Weighted(weights) => weighted_objective(group, partition, weights),
        }
    }
}

/// Which swaps are considered at every iteration.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Neighborhood {
    /// Swaps between the team with the highest diversity penalty and any
    /// other team.
    #[default]
    WorstTeam,
    /// Swaps between any two teams.
    AllPairs,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    GoodEnough,
    NoImprovement,
    IterationCap,
}

#[derive(Clone, Debug)]
pub struct Report {
    pub iterations: usize,
    pub swaps: usize,
    pub initial_score: f64,
    pub final_score: f64,
    /// Tracked score after every committed swap.
    pub history: Vec<f64>,
    pub stop: StopReason,
}

/// A candidate exchange of member `i` of team `a` with member `j` of
/// team `b`.
#[derive(Clone, Copy, Debug)]
struct Swap {
    a: TeamIndex,
    i: usize,
    b: TeamIndex,
    j: usize,
    improvement: f64,
}

/// State of the partition at the start of an iteration.
struct Current {
    scores: Vec<u32>,
    diversity: u32,
    variance: f64,
}

/// Local search exchanging students between teams as long as a swap
/// strictly improves the objective. A swap is never committed if it
/// makes things worse, and the search always stops after
/// `max_iterations` iterations.
#[derive(Clone, Copy, Debug)]
pub struct Optimizer {
    pub objective: Objective,
    pub neighborhood: Neighborhood,
    pub max_iterations: usize,
}

impl Optimizer {
    pub fn new(objective: Objective, neighborhood: Neighborhood) -> Optimizer {
        Optimizer {
            objective,
            neighborhood,
            max_iterations: objective.default_max_iterations(),
        }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Optimizer {
        Optimizer {
            max_iterations,
            ..self
        }
    }

    fn current(&self, group: &TutorialGroup, partition: &Partition) -> Current {
        let scores = team_scores(group, partition);
        let diversity = scores.iter().sum();
        let variance = match self.objective {
            Objective::Diversity => 0.0,
            Objective::Weighted(_) => cgpa_variance(group, partition),
        };
        Current {
            scores,
            diversity,
            variance,
        }
    }

    fn is_good_enough(&self, current: &Current) -> bool {
        current.diversity == 0
            && match self.objective {
                Objective::Diversity => true,
                Objective::Weighted(_) => current.variance < VARIANCE_TOLERANCE,
            }
    }

    /// Pairs of teams to explore, the first one being the team whose
    /// members may leave.
    fn team_pairs(&self, current: &Current) -> Vec<(TeamIndex, TeamIndex)> {
        let n = current.scores.len();
        match self.neighborhood {
            Neighborhood::WorstTeam => {
                let max = current.scores.iter().copied().max().unwrap_or(0);
                let Some(worst) = current.scores.iter().position(|&s| s == max) else {
                    return Vec::new();
                };
                (0..n).filter(|&t| t != worst).map(|t| (worst, t)).collect()
            }
            Neighborhood::AllPairs => (0..n)
                .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
                .collect(),
        }
    }

    /// Improvement brought by the swap already applied to `partition`
    /// between teams `a` and `b`.
    fn improvement(
        &self,
        group: &TutorialGroup,
        partition: &Partition,
        current: &Current,
        a: TeamIndex,
        b: TeamIndex,
    ) -> f64 {
        let before = current.scores[a] + current.scores[b];
        let after =
            diversity_score(group, partition.team(a)) + diversity_score(group, partition.team(b));
        let diversity_gain = f64::from(before) - f64::from(after);
        match self.objective {
            Objective::Diversity => diversity_gain,
            Objective::Weighted(weights) => {
                let variance_gain = current.variance - cgpa_variance(group, partition);
                weights.diversity * diversity_gain + weights.cgpa * variance_gain
            }
        }
    }

    fn best_swap(
        &self,
        group: &TutorialGroup,
        partition: &mut Partition,
        current: &Current,
    ) -> Option<Swap> {
        let mut best: Option<Swap> = None;
        for (a, b) in self.team_pairs(current) {
            for i in 0..partition.size(a) {
                for j in 0..partition.size(b) {
                    partition.swap(a, i, b, j);
                    let improvement = self.improvement(group, partition, current, a, b);
                    partition.swap(a, i, b, j);
                    if improvement > best.map_or(0.0, |s| s.improvement) {
                        best = Some(Swap {
                            a,
                            i,
                            b,
                            j,
                            improvement,
                        });
                    }
                }
            }
        }
        best
    }

    #[instrument(skip_all, fields(group = %group.name))]
    pub fn optimize(&self, group: &TutorialGroup, partition: &mut Partition) -> Report {
        let initial_score = self.objective.score(group, partition);
        let mut history = Vec::new();
        let mut iterations = 0;
        let mut stop = StopReason::IterationCap;
        while iterations < self.max_iterations {
            iterations += 1;
            let current = self.current(group, partition);
            if self.is_good_enough(&current) {
                stop = StopReason::GoodEnough;
                break;
            }
            let Some(swap) = self.best_swap(group, partition, &current) else {
                stop = StopReason::NoImprovement;
                break;
            };
            trace!(
                student = %group.student(partition.team(swap.a)[swap.i]),
                other = %group.student(partition.team(swap.b)[swap.j]),
                from = swap.a,
                to = swap.b,
                improvement = swap.improvement,
                "committing swap"
            );
            partition.swap(swap.a, swap.i, swap.b, swap.j);
            history.push(self.objective.score(group, partition));
        }
        let final_score = history.last().copied().unwrap_or(initial_score);
        if stop == StopReason::IterationCap {
            info!(
                iterations,
                final_score, "iteration cap reached before convergence"
            );
        } else {
            debug!(
                iterations,
                swaps = history.len(),
                initial_score,
                final_score,
                ?stop,
                "optimization done"
            );
        }
        Report {
            iterations,
            swaps: history.len(),
            initial_score,
            final_score,
            history,
            stop,
        }
    }
}

impl Default for Optimizer {
    fn default() -> Optimizer {
        Optimizer::new(Objective::Diversity, Neighborhood::WorstTeam)
    }
}
