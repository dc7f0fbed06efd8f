use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a student inside its tutorial group, starting at 0 and
/// without gaps.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StudentId(pub usize);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Student {
    pub id: StudentId,
    pub student_id: String,
    pub name: String,
    pub school: String,
    pub gender: Gender,
    pub cgpa: f64,
    pub tutorial_group: String,
}

impl Student {
    pub fn new(
        id: StudentId,
        student_id: String,
        name: String,
        school: String,
        gender: Gender,
        cgpa: f64,
        tutorial_group: String,
    ) -> Student {
        Student {
            id,
            student_id,
            name,
            school,
            gender,
            cgpa,
            tutorial_group,
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.student_id)
    }
}
