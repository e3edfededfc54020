use crate::models::{Role, User};

pub const FACULTY_EMAIL: &str = "prof.johnson@university.edu";
pub const STUDENT_EMAIL: &str = "alex.smith@university.edu";

const FACULTY_PASSWORD: &str = "faculty123";
const STUDENT_PASSWORD: &str = "student123";

pub fn faculty_user() -> User {
    User {
        id: "fac-001".to_string(),
        email: FACULTY_EMAIL.to_string(),
        name: "Prof. Johnson".to_string(),
        role: Role::Faculty,
        student_id: None,
        department: Some("Computer Science".to_string()),
    }
}

pub fn student_user() -> User {
    User {
        id: "stu-001".to_string(),
        email: STUDENT_EMAIL.to_string(),
        name: "Alex Smith".to_string(),
        role: Role::Student,
        student_id: Some("STU-2024-001".to_string()),
        department: None,
    }
}

pub fn get_user(email: &str) -> Option<User> {
    match email {
        FACULTY_EMAIL => Some(faculty_user()),
        STUDENT_EMAIL => Some(student_user()),
        _ => None,
    }
}

/// Exact, case-sensitive match against the two demo accounts.
pub fn validate_credentials(email: &str, password: &str) -> Option<User> {
    let known = (email == FACULTY_EMAIL && password == FACULTY_PASSWORD)
        || (email == STUDENT_EMAIL && password == STUDENT_PASSWORD);

    if known {
        get_user(email)
    } else {
        None
    }
}

pub fn demo_hint() -> String {
    format!(
        "Demo accounts:\n- Faculty: {FACULTY_EMAIL} / {FACULTY_PASSWORD}\n\
         - Student: {STUDENT_EMAIL} / {STUDENT_PASSWORD}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_pairs_resolve_to_their_users() {
        let faculty = validate_credentials(FACULTY_EMAIL, "faculty123").unwrap();
        assert_eq!(faculty.role, Role::Faculty);
        assert_eq!(faculty.id, "fac-001");

        let student = validate_credentials(STUDENT_EMAIL, "student123").unwrap();
        assert_eq!(student.role, Role::Student);
        assert_eq!(student.student_id.as_deref(), Some("STU-2024-001"));
    }

    #[test]
    fn repeated_validation_is_idempotent() {
        let first = validate_credentials(STUDENT_EMAIL, "student123");
        let second = validate_credentials(STUDENT_EMAIL, "student123");
        assert_eq!(first, second);
    }

    #[test]
    fn anything_else_is_rejected() {
        let cases = [
            (FACULTY_EMAIL, "student123"),
            (STUDENT_EMAIL, "faculty123"),
            ("PROF.JOHNSON@university.edu", "faculty123"),
            (" alex.smith@university.edu", "student123"),
            (STUDENT_EMAIL, "Student123"),
            (STUDENT_EMAIL, ""),
            ("", ""),
            ("someone@university.edu", "faculty123"),
        ];

        for (email, password) in cases {
            assert!(
                validate_credentials(email, password).is_none(),
                "{email:?}/{password:?} should not validate"
            );
        }
    }

    #[test]
    fn lookup_by_email() {
        assert_eq!(get_user(FACULTY_EMAIL), Some(faculty_user()));
        assert!(get_user("nobody@university.edu").is_none());
    }
}
