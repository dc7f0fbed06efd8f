use crate::algos::{Neighborhood, Objective, Optimizer, Strategy};
use crate::scoring::Weights;
use eyre::{Result, WrapErr, ensure};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub solver: SolverConfig,
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub strategy: Strategy,
    pub team_size: usize,
    /// Number of teams per tutorial group. When absent, it is computed
    /// from the group size and `team_size`.
    pub num_teams: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            strategy: Strategy::default(),
            team_size: 5,
            num_teams: None,
            seed: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveKind {
    #[default]
    Diversity,
    Weighted,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    pub enabled: bool,
    pub objective: ObjectiveKind,
    pub neighborhood: Neighborhood,
    /// Defaults to 500 for the diversity objective and 50 for the
    /// weighted one.
    pub max_iterations: Option<usize>,
    pub weights: Weights,
}

impl Default for OptimizerConfig {
    fn default() -> OptimizerConfig {
        OptimizerConfig {
            enabled: true,
            objective: ObjectiveKind::default(),
            neighborhood: Neighborhood::default(),
            max_iterations: None,
            weights: Weights::default(),
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        let config: Config = toml::from_str(&content).wrap_err("cannot parse configuration file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.solver.team_size > 0, "solver.team_size must be positive");
        ensure!(
            self.solver.num_teams != Some(0),
            "solver.num_teams must be positive"
        );
        let Weights { diversity, cgpa } = self.optimizer.weights;
        ensure!(
            diversity.is_finite() && cgpa.is_finite() && diversity >= 0.0 && cgpa >= 0.0,
            "optimizer.weights must be non-negative numbers"
        );
        Ok(())
    }

    /// The configured optimizer, if optimization is enabled.
    pub fn optimizer(&self) -> Option<Optimizer> {
        let conf = &self.optimizer;
        if !conf.enabled {
            return None;
        }
        let objective = match conf.objective {
            ObjectiveKind::Diversity => Objective::Diversity,
            ObjectiveKind::Weighted => Objective::Weighted(conf.weights),
        };
        let optimizer = Optimizer::new(objective, conf.neighborhood);
        Some(match conf.max_iterations {
            Some(n) => optimizer.with_max_iterations(n),
            None => optimizer,
        })
    }
}
