use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    ClassStatistics, ExamScore, PerformanceMetric, RiskStatus, StudentPerformance,
    StudentRiskRecord,
};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("roster {path} line {line}: `{field}` is out of range")]
    OutOfRange {
        path: String,
        line: usize,
        field: &'static str,
    },
    #[error("roster {0} contains no students")]
    Empty(String),
}

/// Static data behind every view, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub students: Vec<StudentRiskRecord>,
    pub metrics: Vec<PerformanceMetric>,
    pub profile: StudentPerformance,
    pub statistics: ClassStatistics,
}

impl Fixtures {
    pub fn builtin() -> anyhow::Result<Self> {
        Ok(Self {
            students: students()?,
            metrics: performance_metrics()?,
            profile: student_profile()?,
            statistics: class_statistics(),
        })
    }

    /// Replaces the built-in student records with the contents of a CSV roster.
    pub fn with_roster(mut self, roster: Vec<StudentRiskRecord>) -> Self {
        self.students = roster;
        self
    }
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid date")
}

/// `metrics` is attendance, assignment completion, withdrawal risk, failure
/// risk and engagement, in that order.
fn record(
    id: &str,
    name: &str,
    gpa: f64,
    metrics: [u8; 5],
    last_active: NaiveDate,
    status: RiskStatus,
) -> StudentRiskRecord {
    let [attendance_rate, assignment_completion, withdrawal_risk, failure_risk, engagement] =
        metrics;
    let number = id.trim_start_matches("stu-");

    StudentRiskRecord {
        id: id.to_string(),
        name: name.to_string(),
        student_id: format!("STU-2024-{number}"),
        gpa,
        attendance_rate,
        assignment_completion,
        withdrawal_risk,
        failure_risk,
        engagement,
        last_active,
        status,
    }
}

#[rustfmt::skip]
pub fn students() -> anyhow::Result<Vec<StudentRiskRecord>> {
    use RiskStatus::{AtRisk, Healthy, Warning};

    Ok(vec![
        record("stu-001", "Alex Smith", 2.3, [65, 55, 78, 42, 35], date(2024, 2, 8)?, AtRisk),
        record("stu-002", "Jordan Davis", 3.7, [94, 96, 5, 2, 92], date(2024, 2, 9)?, Healthy),
        record("stu-003", "Casey Wong", 2.8, [72, 68, 45, 28, 58], date(2024, 2, 7)?, Warning),
        record("stu-004", "Morgan Lee", 3.2, [88, 82, 12, 8, 75], date(2024, 2, 9)?, Healthy),
        record("stu-005", "Riley Anderson", 2.1, [48, 42, 85, 64, 28], date(2024, 2, 6)?, AtRisk),
        record("stu-006", "Taylor White", 3.5, [92, 88, 8, 5, 88], date(2024, 2, 9)?, Healthy),
    ])
}

pub fn performance_metrics() -> anyhow::Result<Vec<PerformanceMetric>> {
    let rows = vec![
        (date(2024, 1, 15)?, 3.1, 82, 18),
        (date(2024, 1, 22)?, 3.08, 80, 22),
        (date(2024, 1, 29)?, 3.05, 78, 26),
        (date(2024, 2, 5)?, 3.02, 75, 31),
        (date(2024, 2, 9)?, 3.0, 74, 35),
    ];

    Ok(rows
        .into_iter()
        .map(|(date, avg_gpa, avg_attendance, risk_count)| PerformanceMetric {
            date,
            students: 120,
            avg_gpa,
            avg_attendance,
            risk_count,
        })
        .collect())
}

pub fn student_profile() -> anyhow::Result<StudentPerformance> {
    Ok(StudentPerformance {
        id: "stu-001".to_string(),
        name: "Alex Smith".to_string(),
        current_gpa: 2.3,
        target_gpa: 3.0,
        attendance_rate: 65,
        assignments_completed: 11,
        total_assignments: 20,
        exams: vec![
            ExamScore {
                name: "Midterm".to_string(),
                score: 68,
                date: date(2024, 1, 20)?,
            },
            ExamScore {
                name: "Quiz 1".to_string(),
                score: 72,
                date: date(2024, 2, 1)?,
            },
            ExamScore {
                name: "Quiz 2".to_string(),
                score: 65,
                date: date(2024, 2, 8)?,
            },
        ],
        risk_factors: vec![
            "Low attendance rate (65%)".to_string(),
            "Declining assignment completion".to_string(),
            "Below average exam performance".to_string(),
            "Reduced engagement this week".to_string(),
        ],
        strengths: vec![
            "Completed foundational concepts module".to_string(),
            "Participated in study group".to_string(),
            "Submitted recent assignment on time".to_string(),
        ],
    })
}

pub fn class_statistics() -> ClassStatistics {
    ClassStatistics {
        total_students: 120,
        at_risk_count: 18,
        warning_count: 34,
        healthy_count: 68,
        avg_gpa: 3.0,
        withdrawal_rate: 12.5,
    }
}

/// First field outside its documented range: GPA in [0, 4], percentages in
/// [0, 100].
fn out_of_range(record: &StudentRiskRecord) -> Option<&'static str> {
    if !(record.gpa.is_finite() && (0.0..=4.0).contains(&record.gpa)) {
        return Some("gpa");
    }

    [
        ("attendanceRate", record.attendance_rate),
        ("assignmentCompletion", record.assignment_completion),
        ("withdrawalRisk", record.withdrawal_risk),
        ("failureRisk", record.failure_risk),
        ("engagement", record.engagement),
    ]
    .into_iter()
    .find(|(_, value)| *value > 100)
    .map(|(field, _)| field)
}

pub fn load_roster(csv_path: &Path) -> Result<Vec<StudentRiskRecord>, RosterError> {
    let label = csv_path.display().to_string();
    let wrap = |source: csv::Error| RosterError::Csv {
        path: label.clone(),
        source,
    };

    let mut reader = csv::Reader::from_path(csv_path).map_err(wrap)?;
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<StudentRiskRecord>().enumerate() {
        let row = result.map_err(wrap)?;
        if let Some(field) = out_of_range(&row) {
            return Err(RosterError::OutOfRange {
                path: label.clone(),
                // header is line 1
                line: index + 2,
                field,
            });
        }
        records.push(row);
    }

    if records.is_empty() {
        return Err(RosterError::Empty(label));
    }

    tracing::info!(path = %label, count = records.len(), "loaded student roster");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = concat!(
        "id,name,studentId,gpa,attendanceRate,assignmentCompletion,",
        "withdrawalRisk,failureRisk,engagement,lastActive,status"
    );

    #[test]
    fn builtin_fixtures_keep_source_order() {
        let fixtures = Fixtures::builtin().unwrap();
        let ids: Vec<&str> = fixtures.students.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["stu-001", "stu-002", "stu-003", "stu-004", "stu-005", "stu-006"]
        );
        assert_eq!(fixtures.metrics.len(), 5);
        assert_eq!(fixtures.profile.exams.len(), 3);
        assert_eq!(fixtures.statistics.total_students, 120);
    }

    fn roster(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn roster_rows_parse_into_records() {
        let file = roster(&[
            "stu-100,Sam Park,STU-2025-100,2.4,60,50,70,40,30,2025-03-01,at-risk",
            "stu-101,Kai Moss,STU-2025-101,3.9,99,98,1,1,97,2025-03-02,healthy",
        ]);

        let records = load_roster(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, RiskStatus::AtRisk);
        assert_eq!(
            records[1].last_active,
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
        );
    }

    #[test]
    fn roster_with_unknown_status_is_rejected() {
        let file = roster(&[
            "stu-100,Sam Park,STU-2025-100,2.4,60,50,70,40,30,2025-03-01,critical",
        ]);

        assert!(matches!(
            load_roster(file.path()),
            Err(RosterError::Csv { .. })
        ));
    }

    #[test]
    fn roster_values_outside_their_ranges_are_rejected() {
        let cases = [
            ("stu-1,A,S-1,9.5,250,50,200,10,255,2025-03-01,at-risk", "gpa"),
            ("stu-2,B,S-2,NaN,10,10,10,10,10,2025-03-01,healthy", "gpa"),
            ("stu-3,C,S-3,-0.1,10,10,10,10,10,2025-03-01,healthy", "gpa"),
            ("stu-4,D,S-4,2.0,250,50,20,10,55,2025-03-01,warning", "attendanceRate"),
            ("stu-5,E,S-5,2.0,90,50,200,10,55,2025-03-01,warning", "withdrawalRisk"),
            ("stu-6,F,S-6,2.0,90,50,20,10,255,2025-03-01,warning", "engagement"),
        ];

        for (row, expected) in cases {
            let file = roster(&["stu-0,Ok Row,S-0,4.0,100,100,0,0,100,2025-03-01,healthy", row]);
            match load_roster(file.path()) {
                Err(RosterError::OutOfRange { line, field, .. }) => {
                    assert_eq!(line, 3, "{row}");
                    assert_eq!(field, expected, "{row}");
                }
                other => panic!("{row} should be out of range, got {other:?}"),
            }
        }
    }

    #[test]
    fn header_only_roster_is_empty() {
        let file = roster(&[]);

        assert!(matches!(
            load_roster(file.path()),
            Err(RosterError::Empty(_))
        ));
    }
}
