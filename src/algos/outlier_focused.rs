use super::placement::{first_with_room, has_room, same_gender_count, same_school_count};
use super::{Assigner, Layout};
use crate::model::{Partition, StudentId, TeamIndex, TutorialGroup};
use crate::scoring::TOLERATED;
use tracing::{debug, trace};

/// Seed every team with one of the best and one of the worst students,
/// then give each remaining student to the team whose average CGPA ends
/// up closest to the group average, without creating a gender or school
/// majority.
pub struct OutlierFocused;

/// A team accepts a student if it has room and would not hold more than
/// two members of the student's gender or school afterwards.
fn accepts(
    group: &TutorialGroup,
    partition: &Partition,
    team: TeamIndex,
    student: StudentId,
    capacity: usize,
) -> bool {
    has_room(partition, team, capacity)
        && same_gender_count(group, partition, team, student) < TOLERATED
        && same_school_count(group, partition, team, student) < TOLERATED
}

fn future_average(
    group: &TutorialGroup,
    partition: &Partition,
    team: TeamIndex,
    student: StudentId,
) -> f64 {
    let members = partition.team(team);
    let sum = members.iter().map(|&s| group.cgpa(s)).sum::<f64>() + group.cgpa(student);
    sum / (members.len() + 1) as f64
}

impl Assigner for OutlierFocused {
    fn name(&self) -> &'static str {
        "outlier focused"
    }

    fn assign(&mut self, group: &TutorialGroup, layout: Layout) -> Partition {
        let capacity = layout.team_size;
        let mut partition = Partition::new(layout.num_teams);
        let target = group.mean_cgpa();
        let sorted = group.by_decreasing_cgpa(group.all_students());

        // Outliers on both ends never overlap, even with a small group.
        let outliers = layout.num_teams.min(sorted.len() / 2);
        for team in 0..outliers {
            partition.push(team, sorted[team]);
            partition.push(team, sorted[sorted.len() - 1 - team]);
        }
        let middle = &sorted[outliers..sorted.len() - outliers];

        let mut deferred = Vec::new();
        for &student in middle {
            let mut best: Option<(TeamIndex, f64)> = None;
            for team in 0..partition.num_teams() {
                if !accepts(group, &partition, team, student, capacity) {
                    continue;
                }
                let diff = (future_average(group, &partition, team, student) - target).abs();
                if best.is_none_or(|(_, d)| diff < d) {
                    best = Some((team, diff));
                }
            }
            match best {
                Some((team, diff)) => {
                    trace!(student = %group.student(student), team, diff, "best fit");
                    partition.push(team, student);
                }
                None => deferred.push(student),
            }
        }

        if !deferred.is_empty() {
            debug!(
                group = %group.name,
                deferred = deferred.len(),
                "placing students ignoring the majority rules"
            );
        }
        for student in deferred {
            let team = first_with_room(&partition, capacity).unwrap_or(0);
            trace!(student = %group.student(student), team, "fallback placement");
            partition.push(team, student);
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender::*, test_group};

    fn layout(num_teams: usize, team_size: usize) -> Layout {
        Layout {
            num_teams,
            team_size,
        }
    }

    #[test]
    fn test_outliers_are_paired() {
        let g = test_group(&[
            ("A", Male, 1.0),
            ("B", Female, 5.0),
            ("C", Male, 2.0),
            ("D", Female, 4.0),
        ]);
        let p = OutlierFocused.assign(&g, layout(2, 2));
        // Best with worst, second best with second worst.
        assert_eq!(p.team(0), &[StudentId(1), StudentId(0)]);
        assert_eq!(p.team(1), &[StudentId(3), StudentId(2)]);
    }

    #[test]
    fn test_middle_goes_to_closest_average() {
        let g = test_group(&[
            ("A", Male, 4.0),
            ("B", Female, 3.5),
            ("C", Male, 2.0),
            ("D", Female, 1.0),
            ("E", Male, 2.6),
            ("F", Female, 2.4),
        ]);
        // Mean is about 2.58; teams start as {4.0, 1.0} and {3.5, 2.0}, so
        // 2.6 brings team 0 closest and 2.4 takes the last seat of team 1.
        let p = OutlierFocused.assign(&g, layout(2, 3));
        assert_eq!(p.team(0), &[StudentId(0), StudentId(3), StudentId(4)]);
        assert_eq!(p.team(1), &[StudentId(1), StudentId(2), StudentId(5)]);
    }

    #[test]
    fn test_majority_rule_defers_to_free_team() {
        // Every middle student is a man from X, and both teams already
        // hold two men from X after seeding.
        let g = test_group(&[
            ("X", Male, 4.0),
            ("X", Male, 3.9),
            ("X", Male, 3.0),
            ("X", Male, 1.0),
            ("X", Male, 1.1),
        ]);
        let p = OutlierFocused.assign(&g, layout(2, 3));
        assert_eq!(p.team(0), &[StudentId(0), StudentId(3), StudentId(2)]);
        assert_eq!(p.team(1), &[StudentId(1), StudentId(4)]);
    }

    #[test]
    fn test_overflow_into_first_team() {
        let g = test_group(&[
            ("X", Male, 4.0),
            ("Y", Female, 3.0),
            ("Z", Male, 2.0),
        ]);
        let p = OutlierFocused.assign(&g, layout(1, 2));
        assert_eq!(p.team(0), &[StudentId(0), StudentId(2), StudentId(1)]);
    }

    #[test]
    fn test_small_group_is_complete() {
        let g = test_group(&[("X", Male, 4.0), ("Y", Female, 3.0), ("Z", Male, 2.0)]);
        let p = OutlierFocused.assign(&g, layout(10, 5));
        let mut all = p.teams.concat();
        all.sort();
        assert_eq!(all, vec![StudentId(0), StudentId(1), StudentId(2)]);
    }
}
