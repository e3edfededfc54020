use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Faculty,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Faculty => f.write_str("faculty"),
            Role::Student => f.write_str("student"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RiskStatus {
    AtRisk,
    Warning,
    Healthy,
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskStatus::AtRisk => f.write_str("at-risk"),
            RiskStatus::Warning => f.write_str("warning"),
            RiskStatus::Healthy => f.write_str("healthy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRiskRecord {
    pub id: String,
    pub name: String,
    pub student_id: String,
    pub gpa: f64,
    pub attendance_rate: u8,
    pub assignment_completion: u8,
    pub withdrawal_risk: u8,
    pub failure_risk: u8,
    pub engagement: u8,
    pub last_active: NaiveDate,
    pub status: RiskStatus,
}

#[derive(Debug, Clone)]
pub struct PerformanceMetric {
    pub date: NaiveDate,
    pub students: u32,
    pub avg_gpa: f64,
    pub avg_attendance: u8,
    pub risk_count: u32,
}

#[derive(Debug, Clone)]
pub struct ExamScore {
    pub name: String,
    pub score: u8,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct StudentPerformance {
    pub id: String,
    pub name: String,
    pub current_gpa: f64,
    pub target_gpa: f64,
    pub attendance_rate: u8,
    pub assignments_completed: u32,
    pub total_assignments: u32,
    pub exams: Vec<ExamScore>,
    pub risk_factors: Vec<String>,
    pub strengths: Vec<String>,
}

/// Authored class-wide aggregates. Not derived from the student records.
#[derive(Debug, Clone)]
pub struct ClassStatistics {
    pub total_students: u32,
    pub at_risk_count: u32,
    pub warning_count: u32,
    pub healthy_count: u32,
    pub avg_gpa: f64,
    pub withdrawal_rate: f64,
}
