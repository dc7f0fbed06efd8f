use crate::model::{Student, StudentId, TutorialGroup};
use std::collections::BTreeMap;

fn remap_students(students: &mut [Student]) {
    for (idx, student) in students.iter_mut().enumerate() {
        student.id = StudentId(idx);
    }
}

/// Group students by tutorial group, keyed and ordered by group name.
/// Inside every group, students keep their roster order and get ids
/// starting at 0 without gaps.
pub fn split_by_tutorial_group(students: Vec<Student>) -> BTreeMap<String, TutorialGroup> {
    let mut by_group: BTreeMap<String, Vec<Student>> = BTreeMap::new();
    for student in students {
        by_group
            .entry(student.tutorial_group.clone())
            .or_default()
            .push(student);
    }
    by_group
        .into_iter()
        .map(|(name, mut students)| {
            remap_students(&mut students);
            (name.clone(), TutorialGroup::new(name, students))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Gender;

    fn student(row: usize, group: &str) -> Student {
        Student::new(
            StudentId(row),
            format!("U{row}"),
            format!("Name {row}"),
            "CCDS".to_owned(),
            Gender::Male,
            3.0,
            group.to_owned(),
        )
    }

    #[test]
    fn test_split_and_remap() {
        let groups = split_by_tutorial_group(vec![
            student(0, "G-2"),
            student(1, "G-1"),
            student(2, "G-2"),
            student(3, "G-10"),
        ]);
        assert_eq!(
            groups.keys().cloned().collect::<Vec<_>>(),
            vec!["G-1", "G-10", "G-2"]
        );
        let g2 = &groups["G-2"];
        assert_eq!(g2.len(), 2);
        assert_eq!(g2.student(StudentId(0)).student_id, "U0");
        assert_eq!(g2.student(StudentId(1)).student_id, "U2");
        assert_eq!(g2.student(StudentId(1)).id, StudentId(1));
    }
}
