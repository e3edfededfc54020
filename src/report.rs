use std::fmt::Write;

use crate::models::{StudentPerformance, StudentRiskRecord, User};
use crate::router::View;
use crate::views::{Drift, FacultyDashboard, StudentDashboard, StudentDetail};

pub fn render(view: &View<'_>) -> String {
    match view {
        View::Login { hint } => render_login(hint),
        View::FacultyDashboard(dashboard) => render_faculty_dashboard(dashboard),
        View::StudentDetail(detail) => render_student_detail(detail),
        View::StudentDashboard(dashboard) => render_student_dashboard(dashboard),
        View::Roster { status, students } => {
            let label = status.map_or_else(|| "all".to_string(), |s| s.to_string());
            render_roster(&label, students)
        }
    }
}

fn render_login(hint: &str) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Scholar");
    let _ = writeln!(output, "Predictive Analytics for Student Performance");
    let _ = writeln!(output);
    let _ = writeln!(output, "Sign in with `login --email <email> --password <password>`.");
    let _ = writeln!(output);
    let _ = writeln!(output, "{hint}");
    output
}

fn header(output: &mut String, title: &str, user: &User) {
    let _ = writeln!(output, "# {title}");
    match (&user.department, &user.student_id) {
        (Some(department), _) => {
            let _ = writeln!(output, "Signed in as {} ({department})", user.name);
        }
        (None, Some(student_id)) => {
            let _ = writeln!(output, "Signed in as {} ({student_id})", user.name);
        }
        (None, None) => {
            let _ = writeln!(output, "Signed in as {}", user.name);
        }
    }
    let _ = writeln!(output);
}

fn student_line(output: &mut String, student: &StudentRiskRecord) {
    let _ = writeln!(
        output,
        "- {} ({}) GPA {:.1}, attendance {}%, withdrawal risk {}% [{}]",
        student.name,
        student.id,
        student.gpa,
        student.attendance_rate,
        student.withdrawal_risk,
        student.status
    );
}

pub fn render_faculty_dashboard(dashboard: &FacultyDashboard<'_>) -> String {
    let mut output = String::new();
    let stats = dashboard.statistics;
    header(&mut output, "Faculty Dashboard", &dashboard.user);

    let _ = writeln!(output, "## Class Overview");
    let _ = writeln!(output, "- Total students: {}", stats.total_students);
    let _ = writeln!(output, "- At risk: {}", stats.at_risk_count);
    let _ = writeln!(output, "- Warning: {}", stats.warning_count);
    let _ = writeln!(output, "- Healthy: {}", stats.healthy_count);
    let _ = writeln!(output, "- Average GPA: {:.2}", stats.avg_gpa);
    let _ = writeln!(output, "- Withdrawal rate: {:.1}%", stats.withdrawal_rate);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students Requiring Attention");
    if dashboard.at_risk.is_empty() && dashboard.warning.is_empty() {
        let _ = writeln!(output, "No students flagged.");
    } else {
        for student in dashboard.at_risk.iter().chain(dashboard.warning.iter()) {
            student_line(&mut output, student);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Trend");
    for metric in dashboard.trend {
        let _ = writeln!(
            output,
            "- {}: avg GPA {:.2}, attendance {}%, {} at risk of {}",
            metric.date, metric.avg_gpa, metric.avg_attendance, metric.risk_count, metric.students
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Comparison");
    for student in dashboard.comparison {
        let _ = writeln!(
            output,
            "- {}: withdrawal {}%, failure {}%",
            student.name, student.withdrawal_risk, student.failure_risk
        );
    }

    output
}

fn performance_section(output: &mut String, profile: &StudentPerformance) {
    let _ = writeln!(output, "## Exams");
    for exam in &profile.exams {
        let _ = writeln!(output, "- {} on {}: {}", exam.name, exam.date, exam.score);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Factors");
    for factor in &profile.risk_factors {
        let _ = writeln!(output, "- {factor}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Strengths");
    for strength in &profile.strengths {
        let _ = writeln!(output, "- {strength}");
    }
}

pub fn render_student_detail(detail: &StudentDetail<'_>) -> String {
    let mut output = String::new();

    let (record, breakdown, profile) = match detail {
        StudentDetail::NotFound(id) => {
            let _ = writeln!(output, "# Student not found");
            let _ = writeln!(output, "No student with id `{id}`.");
            return output;
        }
        StudentDetail::Found {
            record,
            breakdown,
            profile,
        } => (record, breakdown, profile),
    };

    let _ = writeln!(output, "# {} ({})", record.name, record.student_id);
    let _ = writeln!(output, "Status: {} (last active {})", record.status, record.last_active);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Metrics");
    let _ = writeln!(output, "- GPA: {:.2}", record.gpa);
    let _ = writeln!(output, "- Attendance: {}%", record.attendance_rate);
    let _ = writeln!(output, "- Assignment completion: {}%", record.assignment_completion);
    let _ = writeln!(output, "- Engagement: {}%", record.engagement);
    let _ = writeln!(output, "- Withdrawal risk: {}%", record.withdrawal_risk);
    let _ = writeln!(output, "- Failure risk: {}%", record.failure_risk);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Breakdown");
    let _ = writeln!(output, "- Attendance: {}", breakdown.attendance);
    let _ = writeln!(output, "- Assignment: {}", breakdown.assignment);
    let _ = writeln!(output, "- Engagement: {}", breakdown.engagement);

    if let Some(profile) = profile {
        let _ = writeln!(output);
        performance_section(&mut output, profile);
    }

    output
}

pub fn render_student_dashboard(dashboard: &StudentDashboard<'_>) -> String {
    let mut output = String::new();
    let profile = dashboard.profile;
    header(&mut output, "My Performance", &dashboard.user);

    if dashboard.is_at_risk {
        let _ = writeln!(
            output,
            "> Your GPA is below the recommended threshold. Reach out to your advisor."
        );
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "## Summary for {}", profile.name);
    let _ = writeln!(output, "- Current GPA: {:.2}", profile.current_gpa);
    let _ = writeln!(output, "- Target GPA: {:.2}", profile.target_gpa);
    let _ = writeln!(output, "- Gap to target: {:.2}", dashboard.gpa_gap);
    let _ = writeln!(output, "- Attendance: {}%", profile.attendance_rate);
    let _ = writeln!(
        output,
        "- Assignments: {}/{} ({:.0}%)",
        profile.assignments_completed, profile.total_assignments, dashboard.completion_pct
    );
    let _ = writeln!(output);

    performance_section(&mut output, profile);
    output
}

pub fn render_roster(label: &str, students: &[&StudentRiskRecord]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Students ({label})");

    if students.is_empty() {
        let _ = writeln!(output, "No students match.");
    } else {
        for student in students {
            student_line(&mut output, student);
        }
    }

    output
}

pub fn render_drift(drift: &[Drift]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## Aggregate Audit");

    if drift.is_empty() {
        let _ = writeln!(output, "Class statistics agree with the loaded records.");
    } else {
        for item in drift {
            let _ = writeln!(
                output,
                "- {}: authored {}, records show {}",
                item.field, item.authored, item.observed
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{faculty_user, student_user};
    use crate::fixtures::Fixtures;

    #[test]
    fn faculty_dashboard_lists_flagged_students_first() {
        let fixtures = Fixtures::builtin().unwrap();
        let text = render_faculty_dashboard(&FacultyDashboard::build(faculty_user(), &fixtures));

        assert!(text.contains("Signed in as Prof. Johnson (Computer Science)"));
        assert!(text.contains("- At risk: 18"));
        let alex = text.find("Alex Smith (stu-001)").unwrap();
        let riley = text.find("Riley Anderson (stu-005)").unwrap();
        let casey = text.find("Casey Wong (stu-003)").unwrap();
        assert!(alex < riley && riley < casey);
    }

    #[test]
    fn found_detail_shows_risk_breakdown() {
        let fixtures = Fixtures::builtin().unwrap();
        let text = render_student_detail(&StudentDetail::build(&fixtures, "stu-001"));
        let breakdown = "## Risk Breakdown\n- Attendance: 35\n- Assignment: 45\n- Engagement: 65\n";
        assert!(text.contains(breakdown));
        assert!(text.contains("## Exams"));
    }

    #[test]
    fn not_found_detail_is_its_own_page() {
        let fixtures = Fixtures::builtin().unwrap();
        let text = render_student_detail(&StudentDetail::build(&fixtures, "stu-999"));
        assert!(text.starts_with("# Student not found"));
        assert!(!text.contains("## Metrics"));
    }

    #[test]
    fn student_dashboard_warns_below_threshold() {
        let fixtures = Fixtures::builtin().unwrap();
        let text = render_student_dashboard(&StudentDashboard::build(student_user(), &fixtures));
        assert!(text.contains("below the recommended threshold"));
        assert!(text.contains("## Summary for Alex Smith"));
        assert!(text.contains("- Assignments: 11/20 (55%)"));
        assert!(text.contains("- Quiz 2 on 2024-02-08: 65"));
    }

    #[test]
    fn empty_roster_says_so() {
        assert!(render_roster("warning", &[]).contains("No students match."));
    }

    #[test]
    fn login_page_shows_demo_accounts() {
        let text = render(&View::Login {
            hint: crate::credentials::demo_hint(),
        });
        assert!(text.contains("prof.johnson@university.edu"));
        assert!(text.contains("alex.smith@university.edu"));
    }
}
