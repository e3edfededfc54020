use std::collections::HashMap;

use crate::fixtures::Fixtures;
use crate::models::{
    ClassStatistics, PerformanceMetric, RiskStatus, StudentPerformance, StudentRiskRecord, User,
};

/// Current GPA below this marks the student dashboard as at risk.
pub const AT_RISK_GPA: f64 = 2.5;

/// How many records the faculty comparison chart shows.
pub const COMPARISON_LIMIT: usize = 6;

pub fn students_with_status(
    records: &[StudentRiskRecord],
    status: RiskStatus,
) -> Vec<&StudentRiskRecord> {
    records.iter().filter(|s| s.status == status).collect()
}

pub fn find_student<'a>(
    records: &'a [StudentRiskRecord],
    id: &str,
) -> Option<&'a StudentRiskRecord> {
    records.iter().find(|s| s.id == id)
}

pub struct FacultyDashboard<'a> {
    pub user: User,
    pub statistics: &'a ClassStatistics,
    pub at_risk: Vec<&'a StudentRiskRecord>,
    pub warning: Vec<&'a StudentRiskRecord>,
    pub trend: &'a [PerformanceMetric],
    pub comparison: &'a [StudentRiskRecord],
}

impl<'a> FacultyDashboard<'a> {
    pub fn build(user: User, fixtures: &'a Fixtures) -> Self {
        let limit = fixtures.students.len().min(COMPARISON_LIMIT);
        Self {
            user,
            statistics: &fixtures.statistics,
            at_risk: students_with_status(&fixtures.students, RiskStatus::AtRisk),
            warning: students_with_status(&fixtures.students, RiskStatus::Warning),
            trend: &fixtures.metrics,
            comparison: &fixtures.students[..limit],
        }
    }
}

/// Shortfall from 100% in the three tracked engagement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskBreakdown {
    pub attendance: u8,
    pub assignment: u8,
    pub engagement: u8,
}

impl RiskBreakdown {
    pub fn from_record(record: &StudentRiskRecord) -> Self {
        Self {
            attendance: 100u8.saturating_sub(record.attendance_rate),
            assignment: 100u8.saturating_sub(record.assignment_completion),
            engagement: 100u8.saturating_sub(record.engagement),
        }
    }
}

pub enum StudentDetail<'a> {
    Found {
        record: &'a StudentRiskRecord,
        breakdown: RiskBreakdown,
        /// Detailed performance exists only for the demo student.
        profile: Option<&'a StudentPerformance>,
    },
    NotFound(String),
}

impl<'a> StudentDetail<'a> {
    pub fn build(fixtures: &'a Fixtures, id: &str) -> Self {
        match find_student(&fixtures.students, id) {
            Some(record) => StudentDetail::Found {
                record,
                breakdown: RiskBreakdown::from_record(record),
                profile: (fixtures.profile.id == record.id).then_some(&fixtures.profile),
            },
            None => StudentDetail::NotFound(id.to_string()),
        }
    }
}

pub struct StudentDashboard<'a> {
    pub user: User,
    pub profile: &'a StudentPerformance,
    pub gpa_gap: f64,
    pub is_at_risk: bool,
    pub completion_pct: f64,
}

impl<'a> StudentDashboard<'a> {
    pub fn build(user: User, fixtures: &'a Fixtures) -> Self {
        let profile = &fixtures.profile;
        let completion_pct = if profile.total_assignments == 0 {
            0.0
        } else {
            profile.assignments_completed as f64 / profile.total_assignments as f64 * 100.0
        };

        Self {
            user,
            profile,
            gpa_gap: (profile.target_gpa - profile.current_gpa).max(0.0),
            is_at_risk: profile.current_gpa < AT_RISK_GPA,
            completion_pct,
        }
    }
}

pub fn status_counts(records: &[StudentRiskRecord]) -> HashMap<RiskStatus, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.status).or_insert(0) += 1;
    }
    counts
}

/// A place where an authored aggregate disagrees with the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub field: &'static str,
    pub authored: u32,
    pub observed: usize,
}

/// Compares the authored class counts with the records actually loaded.
/// Rendering never calls this; the statistics are shown as authored.
pub fn aggregate_drift(
    statistics: &ClassStatistics,
    records: &[StudentRiskRecord],
) -> Vec<Drift> {
    let counts = status_counts(records);
    let observed = |status: RiskStatus| counts.get(&status).copied().unwrap_or(0);

    [
        ("totalStudents", statistics.total_students, records.len()),
        ("atRiskCount", statistics.at_risk_count, observed(RiskStatus::AtRisk)),
        ("warningCount", statistics.warning_count, observed(RiskStatus::Warning)),
        ("healthyCount", statistics.healthy_count, observed(RiskStatus::Healthy)),
    ]
    .into_iter()
    .filter(|(_, authored, observed)| *authored as usize != *observed)
    .map(|(field, authored, observed)| Drift {
        field,
        authored,
        observed,
    })
    .collect()
}
