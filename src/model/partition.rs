use super::StudentId;

/// Index of a team inside a partition, starting at 0.
pub type TeamIndex = usize;

/// The teams of one tutorial group. Every student of the group must
/// appear in exactly one team once construction is over.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    pub teams: Vec<Vec<StudentId>>,
}

#[allow(dead_code)]
impl Partition {
    pub fn new(num_teams: usize) -> Partition {
        Partition {
            teams: vec![Vec::new(); num_teams],
        }
    }

    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn team(&self, team: TeamIndex) -> &[StudentId] {
        &self.teams[team]
    }

    pub fn size(&self, team: TeamIndex) -> usize {
        self.teams[team].len()
    }

    /// Total number of students placed in any team.
    pub fn len(&self) -> usize {
        self.teams.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.iter().all(Vec::is_empty)
    }

    pub fn push(&mut self, team: TeamIndex, student: StudentId) {
        self.teams[team].push(student);
    }

    pub fn filter_teams<F>(&self, condition: F) -> Vec<TeamIndex>
    where
        F: Fn(TeamIndex) -> bool,
    {
        (0..self.teams.len()).filter(|&t| condition(t)).collect()
    }

    pub fn team_of(&self, student: StudentId) -> Option<TeamIndex> {
        self.teams.iter().position(|team| team.contains(&student))
    }

    /// Exchange the member at position `i` of team `a` with the member at
    /// position `j` of team `b`.
    pub fn swap(&mut self, a: TeamIndex, i: usize, b: TeamIndex, j: usize) {
        assert_ne!(a, b, "cannot swap members of the same team");
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.teams.split_at_mut(second);
        let (x, y) = if a < b {
            (&mut head[first][i], &mut tail[0][j])
        } else {
            (&mut tail[0][i], &mut head[first][j])
        };
        std::mem::swap(x, y);
    }

    pub fn remove(&mut self, team: TeamIndex, position: usize) -> StudentId {
        self.teams[team].remove(position)
    }

    pub fn insert(&mut self, team: TeamIndex, position: usize, student: StudentId) {
        self.teams[team].insert(position, student);
    }
}

/// Number of teams needed to host `students` with at most `team_size`
/// members each. There is always at least one team.
pub fn num_teams_for(students: usize, team_size: usize) -> usize {
    assert!(team_size > 0, "team size must be positive");
    students.div_ceil(team_size).max(1)
}
