use super::{Assigner, Layout};
use crate::model::{Partition, TutorialGroup};
use tracing::trace;

/// Deal students by decreasing CGPA, going back and forth across the teams
/// (0, 1, …, n-1, n-1, …, 0, 0, 1, …) so that summed CGPA stays close.
/// Gender and school are ignored.
pub struct SnakeDraft;

impl Assigner for SnakeDraft {
    fn name(&self) -> &'static str {
        "snake draft"
    }

    fn assign(&mut self, group: &TutorialGroup, layout: Layout) -> Partition {
        let mut partition = Partition::new(layout.num_teams);
        for (student, team) in group
            .by_decreasing_cgpa(group.all_students())
            .into_iter()
            .zip(snake_order(layout.num_teams))
        {
            trace!(student = %group.student(student), team, "drafting");
            partition.push(team, student);
        }
        partition
    }
}

/// Endless sequence of team indices visited by a snake draft.
fn snake_order(num_teams: usize) -> impl Iterator<Item = usize> {
    (0..num_teams).chain((0..num_teams).rev()).cycle()
}
