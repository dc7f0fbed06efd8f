pub use self::algo::{Assigner, Layout};
pub use self::gender_priority::GenderPriority;
pub use self::optimizer::{Neighborhood, Objective, Optimizer, Report, StopReason};
pub use self::outlier_focused::OutlierFocused;
pub use self::randomized::Randomized;
pub use self::snake_draft::SnakeDraft;

use rand::rngs::StdRng;
use serde::Deserialize;
use std::fmt;

mod algo;
mod gender_priority;
mod optimizer;
mod outlier_focused;
mod placement;
mod randomized;
mod snake_draft;

/// Constructive strategy used to build the initial teams.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    SnakeDraft,
    GenderPriority,
    OutlierFocused,
    Random,
}

impl Strategy {
    #[cfg(test)]
    pub const ALL: [Strategy; 4] = [
        Strategy::SnakeDraft,
        Strategy::GenderPriority,
        Strategy::OutlierFocused,
        Strategy::Random,
    ];

    /// Build the assigner. Only the random baseline uses `rng`.
    pub fn assigner(self, rng: StdRng) -> Box<dyn Assigner + Send> {
        match self {
            Strategy::SnakeDraft => Box::new(SnakeDraft),
            Strategy::GenderPriority => Box::new(GenderPriority),
            Strategy::OutlierFocused => Box::new(OutlierFocused),
            Strategy::Random => Box::new(Randomized::new(rng)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::SnakeDraft => "snake-draft",
            Strategy::GenderPriority => "gender-priority",
            Strategy::OutlierFocused => "outlier-focused",
            Strategy::Random => "random",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender::*, StudentId, TutorialGroup, test_group};
    use rand::SeedableRng;

    fn mixed_group(n: usize) -> TutorialGroup {
        let schools = ["CCDS", "EEE", "SPMS", "NBS", "CEE", "MAE", "SSS"];
        let rows = (0..n)
            .map(|i| {
                (
                    schools[(i * 5) % schools.len()],
                    if i % 3 == 1 { Female } else { Male },
                    ((i * 37) % 50) as f64 / 10.0,
                )
            })
            .collect::<Vec<_>>();
        test_group(&rows)
    }

    #[test]
    fn test_every_strategy_is_complete() {
        for n in [1, 4, 9, 23, 50, 57] {
            let g = mixed_group(n);
            for num_teams in [1, 3, 10] {
                let layout = Layout {
                    num_teams,
                    team_size: 5,
                };
                for strategy in Strategy::ALL {
                    let p = strategy
                        .assigner(StdRng::seed_from_u64(3))
                        .assign(&g, layout);
                    assert_eq!(p.num_teams(), num_teams, "{strategy}");
                    let mut all = p.teams.concat();
                    all.sort();
                    assert_eq!(
                        all,
                        (0..n).map(StudentId).collect::<Vec<_>>(),
                        "{strategy} with {n} students in {num_teams} teams"
                    );
                }
            }
        }
    }

    #[test]
    fn test_strategy_names_parse() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: Strategy,
        }
        for strategy in Strategy::ALL {
            let parsed: Wrapper = toml::from_str(&format!("strategy = \"{strategy}\"")).unwrap();
            assert_eq!(parsed.strategy, strategy);
        }
    }
}
