use crate::model::{Partition, TutorialGroup};
use crate::stats::team_stats;
use eyre::{Result, bail, ensure};
use tracing::warn;

/// Check that every student of the group appears in exactly one team.
pub fn ensure_complete(group: &TutorialGroup, partition: &Partition) -> Result<()> {
    let mut seen = vec![false; group.len()];
    for team in &partition.teams {
        for &student in team {
            ensure!(
                student.0 < group.len(),
                "unknown student {} in group {}",
                student.0,
                group.name
            );
            if seen[student.0] {
                bail!(
                    "student {} appears more than once in group {}",
                    group.student(student),
                    group.name
                );
            }
            seen[student.0] = true;
        }
    }
    if let Some(missing) = seen.iter().position(|&s| !s) {
        bail!(
            "{} students of group {} have no team, including {}",
            seen.iter().filter(|&&s| !s).count(),
            group.name,
            group.students[missing]
        );
    }
    Ok(())
}

/// Warn about teams made of a single gender or dominated by a school.
pub fn check_diversity(group: &TutorialGroup, partition: &Partition) {
    for (index, team) in partition.teams.iter().enumerate() {
        let stats = team_stats(group, team);
        if stats.is_single_gender() || stats.school_majority {
            warn!(
                group = %group.name,
                team = index + 1,
                composition = %stats.composition(),
                school_majority = stats.school_majority,
                diversity = stats.diversity,
                "team lacks diversity"
            );
        }
    }
}
