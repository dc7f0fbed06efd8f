//! Helpers shared by the constructive strategies to decide where a student
//! may go.

use crate::model::{Partition, StudentId, TeamIndex, TutorialGroup};

pub fn same_school_count(
    group: &TutorialGroup,
    partition: &Partition,
    team: TeamIndex,
    student: StudentId,
) -> usize {
    let school = group.school(student);
    partition
        .team(team)
        .iter()
        .filter(|&&s| group.school(s) == school)
        .count()
}

pub fn same_gender_count(
    group: &TutorialGroup,
    partition: &Partition,
    team: TeamIndex,
    student: StudentId,
) -> usize {
    let gender = group.gender(student);
    partition
        .team(team)
        .iter()
        .filter(|&&s| group.gender(s) == gender)
        .count()
}

pub fn has_room(partition: &Partition, team: TeamIndex, capacity: usize) -> bool {
    partition.size(team) < capacity
}

pub fn first_with_room(partition: &Partition, capacity: usize) -> Option<TeamIndex> {
    (0..partition.num_teams()).find(|&t| has_room(partition, t, capacity))
}

/// First of the teams with the fewest members.
pub fn smallest_team(partition: &Partition) -> TeamIndex {
    (0..partition.num_teams())
        .min_by_key(|&t| partition.size(t))
        .unwrap_or(0)
}
