use super::{Assigner, Layout};
use crate::model::{Partition, TutorialGroup};
use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle the group and cut it into consecutive slices. This ignores every
/// objective and only serves as a baseline.
pub struct Randomized<R: Rng> {
    rng: R,
}

impl<R: Rng> Randomized<R> {
    pub fn new(rng: R) -> Randomized<R> {
        Randomized { rng }
    }
}

impl<R: Rng> Assigner for Randomized<R> {
    fn name(&self) -> &'static str {
        "random"
    }

    /// The first `len % num_teams` slices get one extra member, so team
    /// sizes never differ by more than one.
    fn assign(&mut self, group: &TutorialGroup, layout: Layout) -> Partition {
        let mut students = group.all_students();
        students.shuffle(&mut self.rng);
        let num_teams = layout.num_teams;
        let (base, extra) = (students.len() / num_teams, students.len() % num_teams);
        let mut partition = Partition::new(num_teams);
        let mut students = students.into_iter();
        for team in 0..num_teams {
            let size = base + usize::from(team < extra);
            for student in students.by_ref().take(size) {
                partition.push(team, student);
            }
        }
        partition
    }
}
