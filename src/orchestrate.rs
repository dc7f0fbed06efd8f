use crate::algos::{Layout, Neighborhood, Objective, Optimizer, Report, Strategy};
use crate::checks::ensure_complete;
use crate::config::Config;
use crate::model::{Gender, Partition, TutorialGroup, num_teams_for};
use crate::scoring::Weights;
use eyre::{Result, WrapErr, ensure};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

/// How every tutorial group gets partitioned.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub strategy: Strategy,
    pub team_size: usize,
    pub num_teams: Option<usize>,
    pub optimizer: Option<Optimizer>,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn from_config(config: &Config) -> Settings {
        Settings {
            strategy: config.solver.strategy,
            team_size: config.solver.team_size,
            num_teams: config.solver.num_teams,
            optimizer: config.optimizer(),
            seed: config.solver.seed,
        }
    }

    pub fn layout(&self, group: &TutorialGroup) -> Layout {
        Layout {
            num_teams: self
                .num_teams
                .unwrap_or_else(|| num_teams_for(group.len(), self.team_size)),
            team_size: self.team_size,
        }
    }

    /// Random generator for the group at position `ordinal` in name order.
    /// With a seed, the result does not depend on which thread runs the
    /// group.
    fn rng_for(&self, ordinal: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(ordinal as u64)),
            None => StdRng::from_os_rng(),
        }
    }
}

#[derive(Debug)]
pub struct GroupOutcome {
    pub group: TutorialGroup,
    pub partition: Partition,
    pub report: Option<Report>,
    pub elapsed: Duration,
}

/// One line of the exported team list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assignment {
    #[serde(rename = "Tutorial Group")]
    pub tutorial_group: String,
    #[serde(rename = "Team Assigned")]
    pub team: usize,
    #[serde(rename = "Student ID")]
    pub student_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "School")]
    pub school: String,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "CGPA")]
    pub cgpa: f64,
}

/// Build the teams of a single tutorial group, then improve them if an
/// optimizer is configured.
#[instrument(skip_all, fields(group = %group.name, strategy = %settings.strategy))]
pub fn run_group(group: TutorialGroup, settings: &Settings, rng: StdRng) -> Result<GroupOutcome> {
    ensure!(!group.is_empty(), "tutorial group {} is empty", group.name);
    let start = Instant::now();
    let layout = settings.layout(&group);
    ensure!(layout.num_teams > 0, "at least one team is needed");
    debug!(
        students = group.len(),
        num_teams = layout.num_teams,
        team_size = layout.team_size,
        "building teams"
    );
    let mut assigner = settings.strategy.assigner(rng);
    let mut partition = assigner.assign(&group, layout);
    ensure_complete(&group, &partition)
        .wrap_err_with(|| format!("{} produced an incomplete partition", assigner.name()))?;
    let report = settings
        .optimizer
        .map(|optimizer| optimizer.optimize(&group, &mut partition));
    ensure_complete(&group, &partition).wrap_err("optimization lost track of students")?;
    let elapsed = start.elapsed();
    info!(
        elapsed = ?elapsed,
        swaps = report.as_ref().map_or(0, |r| r.swaps),
        "tutorial group done"
    );
    Ok(GroupOutcome {
        group,
        partition,
        report,
        elapsed,
    })
}

/// Process the groups one after the other, in name order.
pub fn run_all(
    groups: BTreeMap<String, TutorialGroup>,
    settings: &Settings,
) -> Result<Vec<GroupOutcome>> {
    groups
        .into_values()
        .enumerate()
        .map(|(ordinal, group)| run_group(group, settings, settings.rng_for(ordinal)))
        .collect()
}

/// Process every group in its own blocking task. Groups share nothing, so
/// the outcomes are identical to the ones of `run_all`.
pub async fn run_all_parallel(
    groups: BTreeMap<String, TutorialGroup>,
    settings: &Settings,
) -> Result<Vec<GroupOutcome>> {
    let mut tasks = JoinSet::new();
    for (ordinal, group) in groups.into_values().enumerate() {
        let settings = *settings;
        let rng = settings.rng_for(ordinal);
        tasks.spawn_blocking(move || run_group(group, &settings, rng));
    }
    let mut outcomes = BTreeMap::new();
    while let Some(outcome) = tasks.join_next().await {
        let outcome = outcome.wrap_err("team building task failed")??;
        outcomes.insert(outcome.group.name.clone(), outcome);
    }
    Ok(outcomes.into_values().collect())
}

/// A constructive strategy, possibly followed by an optimization, as
/// compared by `run_comparison`.
#[derive(Clone, Copy, Debug)]
pub struct Pipeline {
    pub label: &'static str,
    pub strategy: Strategy,
    pub optimizer: Option<Optimizer>,
}

/// The compared pipelines. Only the snake draft gets optimized, either
/// on diversity alone or on diversity and CGPA balance with `weights`.
/// The random baseline stays untouched.
pub fn comparison_pipelines(weights: Weights) -> [Pipeline; 5] {
    [
        Pipeline {
            label: "snake-draft",
            strategy: Strategy::SnakeDraft,
            optimizer: Some(Optimizer::new(Objective::Diversity, Neighborhood::WorstTeam)),
        },
        Pipeline {
            label: "gender-priority",
            strategy: Strategy::GenderPriority,
            optimizer: None,
        },
        Pipeline {
            label: "outlier-focused",
            strategy: Strategy::OutlierFocused,
            optimizer: None,
        },
        Pipeline {
            label: "gpa-optimized",
            strategy: Strategy::SnakeDraft,
            optimizer: Some(Optimizer::new(
                Objective::Weighted(weights),
                Neighborhood::AllPairs,
            )),
        },
        Pipeline {
            label: "random",
            strategy: Strategy::Random,
            optimizer: None,
        },
    ]
}

/// Run every comparison pipeline on the same groups. Team layout and seed
/// come from `settings`, its strategy and optimizer are ignored.
pub fn run_comparison(
    groups: &BTreeMap<String, TutorialGroup>,
    settings: &Settings,
    weights: Weights,
) -> Result<Vec<(Pipeline, Vec<GroupOutcome>)>> {
    comparison_pipelines(weights)
        .into_iter()
        .map(|pipeline| {
            let settings = Settings {
                strategy: pipeline.strategy,
                optimizer: pipeline.optimizer,
                ..*settings
            };
            info!(pipeline = pipeline.label, "running comparison pipeline");
            Ok((pipeline, run_all(groups.clone(), &settings)?))
        })
        .collect()
}

/// Number the teams from 1 in every group and flatten everything, groups
/// being ordered by name.
pub fn finalize(outcomes: &[GroupOutcome]) -> Vec<Assignment> {
    let mut outcomes = outcomes.iter().collect::<Vec<_>>();
    outcomes.sort_by(|a, b| a.group.name.cmp(&b.group.name));
    outcomes
        .into_iter()
        .flat_map(|outcome| {
            outcome
                .partition
                .teams
                .iter()
                .enumerate()
                .flat_map(move |(index, team)| {
                    team.iter().map(move |&s| {
                        let student = outcome.group.student(s);
                        Assignment {
                            tutorial_group: outcome.group.name.clone(),
                            team: index + 1,
                            student_id: student.student_id.clone(),
                            name: student.name.clone(),
                            school: student.school.clone(),
                            gender: student.gender,
                            cgpa: student.cgpa,
                        }
                    })
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Student, StudentId};
    use crate::remap::split_by_tutorial_group;

    fn roster(groups: &[&str], per_group: usize) -> Vec<Student> {
        let schools = ["CCDS", "EEE", "SPMS", "NBS", "CEE", "MAE"];
        let mut students = Vec::new();
        for group in groups {
            for i in 0..per_group {
                let row = students.len();
                students.push(Student::new(
                    StudentId(row),
                    format!("U{row:04}"),
                    format!("Student {row}"),
                    schools[(row * 7) % schools.len()].to_owned(),
                    if row % 5 < 2 {
                        Gender::Female
                    } else {
                        Gender::Male
                    },
                    1.0 + ((row * 13 + i) % 40) as f64 / 10.0,
                    (*group).to_owned(),
                ));
            }
        }
        students
    }

    fn settings(strategy: Strategy) -> Settings {
        Settings {
            strategy,
            team_size: 5,
            num_teams: None,
            optimizer: Some(Optimizer::new(Objective::Diversity, Neighborhood::WorstTeam)),
            seed: Some(17),
        }
    }

    #[test]
    fn test_layout() {
        let groups = split_by_tutorial_group(roster(&["G-1"], 23));
        let s = settings(Strategy::SnakeDraft);
        assert_eq!(s.layout(&groups["G-1"]).num_teams, 5);
        let fixed = Settings {
            num_teams: Some(10),
            ..s
        };
        assert_eq!(fixed.layout(&groups["G-1"]).num_teams, 10);
    }

    #[test]
    fn test_finalize_numbers_teams_per_group() {
        let groups = split_by_tutorial_group(roster(&["G-2", "G-1"], 12));
        let outcomes = run_all(groups, &settings(Strategy::GenderPriority)).unwrap();
        let assignments = finalize(&outcomes);
        assert_eq!(assignments.len(), 24);
        assert!(assignments[..12].iter().all(|a| a.tutorial_group == "G-1"));
        assert!(assignments[12..].iter().all(|a| a.tutorial_group == "G-2"));
        assert_eq!(assignments[0].team, 1);
        assert!(assignments.iter().all(|a| (1..=3).contains(&a.team)));
        let mut ids = assignments
            .iter()
            .map(|a| a.student_id.clone())
            .collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 24);
    }

    #[test]
    fn test_optimizer_never_worsens() {
        let groups = split_by_tutorial_group(roster(&["G-1", "G-2", "G-3"], 30));
        let outcomes = run_all(groups, &settings(Strategy::SnakeDraft)).unwrap();
        for outcome in outcomes {
            let report = outcome.report.unwrap();
            assert!(report.final_score <= report.initial_score);
        }
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let group = TutorialGroup::new("G-1".to_owned(), Vec::new());
        let s = settings(Strategy::OutlierFocused);
        assert!(run_group(group, &s, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_comparison_pipelines() {
        let groups = split_by_tutorial_group(roster(&["G-1", "G-2"], 20));
        let weights = Weights::default();
        let results = run_comparison(&groups, &settings(Strategy::Random), weights).unwrap();
        assert_eq!(
            results.iter().map(|(p, _)| p.label).collect::<Vec<_>>(),
            [
                "snake-draft",
                "gender-priority",
                "outlier-focused",
                "gpa-optimized",
                "random"
            ]
        );
        for (pipeline, outcomes) in &results {
            assert_eq!(outcomes.len(), 2);
            for outcome in outcomes {
                assert_eq!(
                    outcome.report.is_some(),
                    pipeline.optimizer.is_some(),
                    "{}",
                    pipeline.label
                );
            }
        }
        let pipeline = |label: &str| {
            results
                .iter()
                .find(|(p, _)| p.label == label)
                .map(|(p, outcomes)| (*p, outcomes))
                .unwrap()
        };
        for label in ["random", "gender-priority", "outlier-focused"] {
            let (p, outcomes) = pipeline(label);
            assert!(p.optimizer.is_none());
            assert!(outcomes.iter().all(|o| o.report.is_none()));
        }
        let (snake, _) = pipeline("snake-draft");
        let optimizer = snake.optimizer.unwrap();
        assert_eq!(snake.strategy, Strategy::SnakeDraft);
        assert_eq!(optimizer.objective, Objective::Diversity);
        assert_eq!(optimizer.neighborhood, Neighborhood::WorstTeam);
        assert_eq!(optimizer.max_iterations, 500);
        let (gpa, outcomes) = pipeline("gpa-optimized");
        let optimizer = gpa.optimizer.unwrap();
        assert_eq!(gpa.strategy, Strategy::SnakeDraft);
        assert_eq!(optimizer.objective, Objective::Weighted(weights));
        assert_eq!(optimizer.neighborhood, Neighborhood::AllPairs);
        assert_eq!(optimizer.max_iterations, 50);
        assert!(outcomes.iter().all(|o| o.report.as_ref().unwrap().iterations <= 50));
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let students = roster(&["G-3", "G-1", "G-2"], 25);
        for strategy in Strategy::ALL {
            let s = settings(strategy);
            let sequential = run_all(split_by_tutorial_group(students.clone()), &s).unwrap();
            let parallel = run_all_parallel(split_by_tutorial_group(students.clone()), &s)
                .await
                .unwrap();
            assert_eq!(finalize(&sequential), finalize(&parallel), "{strategy}");
        }
    }
}
