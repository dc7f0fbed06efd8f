pub use self::group::TutorialGroup;
pub use self::partition::{Partition, TeamIndex, num_teams_for};
pub use self::student::{Gender, Student, StudentId};

#[cfg(test)]
pub use self::group::test_group;

mod group;
mod partition;
mod student;
