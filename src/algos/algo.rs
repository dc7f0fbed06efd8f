use crate::model::{Partition, TutorialGroup};

/// Shape of the partition to build for one tutorial group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Layout {
    pub num_teams: usize,
    /// Target number of members per team. Strategies which respect a
    /// capacity only exceed it when the group does not fit.
    pub team_size: usize,
}

pub trait Assigner {
    fn name(&self) -> &'static str;

    /// Build an initial partition of `group` into `layout.num_teams` teams.
    /// Every student of the group ends up in exactly one team.
    fn assign(&mut self, group: &TutorialGroup, layout: Layout) -> Partition;
}
