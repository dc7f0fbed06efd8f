use super::placement::{first_with_room, has_room, same_school_count, smallest_team};
use super::{Assigner, Layout};
use crate::model::{Gender, Partition, StudentId, TeamIndex, TutorialGroup};
use tracing::{debug, trace};

/// A placement is refused when the team already holds this many students
/// from the same school.
const MAX_SAME_SCHOOL: usize = 2;

/// Spread the minority gender first, one per team in turn, then fill the
/// teams with the majority gender (best CGPA first) while never putting a
/// third student of the same school in a team.
pub struct GenderPriority;

fn school_allows(
    group: &TutorialGroup,
    partition: &Partition,
    team: TeamIndex,
    student: StudentId,
) -> bool {
    same_school_count(group, partition, team, student) < MAX_SAME_SCHOOL
}

impl GenderPriority {
    /// Place a student which could not be placed while respecting the
    /// school rule. Teams with room are used first, ignoring the rule.
    /// When every team is full, a member whose departure makes the school
    /// rule hold is exchanged with the student and moved elsewhere. As a
    /// last resort the smallest team grows beyond its capacity.
    fn place_deferred(
        group: &TutorialGroup,
        partition: &mut Partition,
        student: StudentId,
        capacity: usize,
    ) {
        if let Some(team) = first_with_room(partition, capacity) {
            trace!(
                student = %group.student(student),
                team,
                "placing deferred student in team with room"
            );
            partition.push(team, student);
            return;
        }
        if Self::repair(group, partition, student, capacity) {
            return;
        }
        let team = smallest_team(partition);
        debug!(student = %group.student(student), team, "no room left, overflowing team");
        partition.push(team, student);
    }

    fn repair(
        group: &TutorialGroup,
        partition: &mut Partition,
        student: StudentId,
        capacity: usize,
    ) -> bool {
        for team in 0..partition.num_teams() {
            for position in 0..partition.size(team) {
                let member = partition.remove(team, position);
                if !school_allows(group, partition, team, student) {
                    partition.insert(team, position, member);
                    continue;
                }
                partition.insert(team, position, student);
                let others = partition.filter_teams(|t| t != team);
                let target = others
                    .iter()
                    .copied()
                    .find(|&t| has_room(partition, t, capacity))
                    .or_else(|| others.iter().copied().min_by_key(|&t| partition.size(t)))
                    .unwrap_or(team);
                debug!(
                    student = %group.student(student),
                    displaced = %group.student(member),
                    team,
                    target,
                    "exchanging deferred student with a team member"
                );
                partition.push(target, member);
                return true;
            }
        }
        false
    }
}

impl Assigner for GenderPriority {
    fn name(&self) -> &'static str {
        "gender priority"
    }

    fn assign(&mut self, group: &TutorialGroup, layout: Layout) -> Partition {
        let num_teams = layout.num_teams;
        let capacity = layout.team_size;
        let mut partition = Partition::new(num_teams);
        let males = group.by_decreasing_cgpa(group.filter_students(|s| s.gender == Gender::Male));
        let females =
            group.by_decreasing_cgpa(group.filter_students(|s| s.gender == Gender::Female));
        let (minority, majority) = if males.len() < females.len() {
            (males, females)
        } else {
            (females, males)
        };

        for (i, &student) in minority.iter().enumerate() {
            partition.push(i % num_teams, student);
        }

        // Successive placements start looking from successive teams.
        let mut deferred = Vec::new();
        let mut start = 0;
        let mut majority = majority.into_iter();
        while first_with_room(&partition, capacity).is_some() {
            let Some(student) = majority.next() else {
                break;
            };
            let team = (0..num_teams).map(|i| (start + i) % num_teams).find(|&t| {
                has_room(&partition, t, capacity) && school_allows(group, &partition, t, student)
            });
            match team {
                Some(team) => partition.push(team, student),
                None => {
                    trace!(student = %group.student(student), "deferring student");
                    deferred.push(student);
                }
            }
            start = (start + 1) % num_teams;
        }
        deferred.extend(majority);

        if !deferred.is_empty() {
            debug!(
                group = %group.name,
                deferred = deferred.len(),
                "placing students which did not fit the school rule"
            );
        }
        for student in deferred {
            Self::place_deferred(group, &mut partition, student, capacity);
        }
        partition
    }
}
