use super::{Gender, Student, StudentId};

/// Students sharing the same tutorial group. Teams are only ever built
/// from the members of a single group.
#[derive(Clone, Debug)]
pub struct TutorialGroup {
    pub name: String,
    pub students: Vec<Student>,
}

impl TutorialGroup {
    pub fn new(name: String, students: Vec<Student>) -> TutorialGroup {
        debug_assert!(
            students
                .iter()
                .enumerate()
                .all(|(idx, s)| s.id == StudentId(idx) && s.tutorial_group == name),
            "students must be remapped and belong to the group"
        );
        TutorialGroup { name, students }
    }

    pub fn student(&self, StudentId(student): StudentId) -> &Student {
        &self.students[student]
    }

    pub fn cgpa(&self, student: StudentId) -> f64 {
        self.student(student).cgpa
    }

    pub fn gender(&self, student: StudentId) -> Gender {
        self.student(student).gender
    }

    pub fn school(&self, student: StudentId) -> &str {
        &self.student(student).school
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn all_students(&self) -> Vec<StudentId> {
        (0..self.students.len()).map(StudentId).collect()
    }

    pub fn filter_students<F>(&self, condition: F) -> Vec<StudentId>
    where
        F: Fn(&Student) -> bool,
    {
        self.students
            .iter()
            .filter(|s| condition(s))
            .map(|s| s.id)
            .collect()
    }

    /// Students ordered by decreasing CGPA. Students with the same CGPA
    /// keep their roster order.
    pub fn by_decreasing_cgpa(&self, mut students: Vec<StudentId>) -> Vec<StudentId> {
        students.sort_by(|&a, &b| self.cgpa(b).total_cmp(&self.cgpa(a)));
        students
    }

    /// Average CGPA over the whole group, or 0 if the group is empty.
    pub fn mean_cgpa(&self) -> f64 {
        if self.students.is_empty() {
            return 0.0;
        }
        self.students.iter().map(|s| s.cgpa).sum::<f64>() / self.students.len() as f64
    }
}

/// Build a group from `(school, gender, cgpa)` triples, with generated
/// names and external ids.
#[cfg(test)]
pub fn test_group(rows: &[(&str, Gender, f64)]) -> TutorialGroup {
    let students = rows
        .iter()
        .enumerate()
        .map(|(idx, &(school, gender, cgpa))| {
            Student::new(
                StudentId(idx),
                format!("S{idx:03}"),
                format!("Student {idx}"),
                school.to_owned(),
                gender,
                cgpa,
                "G-1".to_owned(),
            )
        })
        .collect();
    TutorialGroup::new("G-1".to_owned(), students)
}
