use crate::model::{Gender, Student, StudentId};
use crate::orchestrate::{Assignment, GroupOutcome};
use eyre::{Result, WrapErr, ensure};
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, trace};

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(rename = "Tutorial Group")]
    tutorial_group: String,
    #[serde(rename = "Student ID")]
    student_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "School")]
    school: String,
    #[serde(rename = "Gender")]
    gender: Gender,
    #[serde(rename = "CGPA")]
    cgpa: f64,
}

/// Load a roster from a CSV file with a header line. Columns other than
/// the expected ones are ignored.
pub fn load(path: &Path) -> Result<Vec<Student>> {
    let file = File::open(path).wrap_err_with(|| format!("cannot open {}", path.display()))?;
    let students =
        load_from(file).wrap_err_with(|| format!("cannot load students from {}", path.display()))?;
    debug!(students = students.len(), path = %path.display(), "roster loaded");
    Ok(students)
}

pub fn load_from<R: Read>(reader: R) -> Result<Vec<Student>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut students = Vec::new();
    for (row, record) in reader.deserialize::<Record>().enumerate() {
        // Line 1 holds the headers.
        let line = row + 2;
        let record = record.wrap_err_with(|| format!("invalid record at line {line}"))?;
        ensure!(
            record.cgpa.is_finite() && record.cgpa >= 0.0,
            "invalid CGPA {} at line {line}",
            record.cgpa
        );
        let student = Student::new(
            StudentId(row),
            record.student_id,
            record.name,
            record.school,
            record.gender,
            record.cgpa,
            record.tutorial_group,
        );
        trace!(student = %student, group = %student.tutorial_group, "loaded student");
        students.push(student);
    }
    ensure!(!students.is_empty(), "no student found");
    Ok(students)
}

/// Write the final team list as CSV, headers included.
pub fn save_assignments(path: &Path, assignments: &[Assignment]) -> Result<()> {
    let file = File::create(path).wrap_err_with(|| format!("cannot create {}", path.display()))?;
    write_assignments(file, assignments)
        .wrap_err_with(|| format!("cannot save assignments to {}", path.display()))
}

pub fn write_assignments<W: Write>(writer: W, assignments: &[Assignment]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for assignment in assignments {
        writer.serialize(assignment)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the time spent on every tutorial group, in seconds, one per line.
pub fn save_timings(path: &Path, outcomes: &[GroupOutcome]) -> Result<()> {
    let mut file =
        File::create(path).wrap_err_with(|| format!("cannot create {}", path.display()))?;
    for outcome in outcomes {
        writeln!(file, "{}", outcome.elapsed.as_secs_f64())?;
    }
    Ok(())
}
