use thiserror::Error;

use crate::credentials;
use crate::fixtures::Fixtures;
use crate::guard::{dashboard_for, Access, GuardState, RoleGuard, Route};
use crate::models::{Role, RiskStatus, StudentRiskRecord, User};
use crate::session::SessionManager;
use crate::storage::{SlotStore, StorageError};
use crate::views::{self, FacultyDashboard, StudentDashboard, StudentDetail};

const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("could not store session: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("redirect loop while opening {0}")]
    TooManyRedirects(Route),
}

pub enum View<'f> {
    Login { hint: String },
    FacultyDashboard(FacultyDashboard<'f>),
    StudentDetail(StudentDetail<'f>),
    StudentDashboard(StudentDashboard<'f>),
    Roster {
        status: Option<RiskStatus>,
        students: Vec<&'f StudentRiskRecord>,
    },
}

pub enum Outcome<'f> {
    Render(View<'f>),
    Redirect(Route),
}

/// Mounts routes against one session store and one fixture set. Every mount
/// gets a fresh guard; nothing about the user is cached between mounts.
pub struct Navigator<'f, S> {
    sessions: SessionManager<S>,
    fixtures: &'f Fixtures,
}

impl<'f, S: SlotStore> Navigator<'f, S> {
    pub fn new(sessions: SessionManager<S>, fixtures: &'f Fixtures) -> Self {
        Self { sessions, fixtures }
    }

    pub fn current_user(&mut self) -> Option<User> {
        self.sessions.load_session()
    }

    /// Validates the credentials, stores the session and returns the
    /// dashboard for the user's role.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Route, LoginError> {
        let user = credentials::validate_credentials(email, password)
            .ok_or(LoginError::InvalidCredentials)?;
        self.sessions.save_session(&user)?;
        tracing::info!(user = %user.id, role = %user.role, "signed in");
        Ok(dashboard_for(user.role))
    }

    pub fn logout(&mut self) -> Route {
        let mut guard = RoleGuard::new(Access::AnySession);
        guard.check(&mut self.sessions);
        if let Some(user) = guard.user() {
            tracing::info!(user = %user.id, "signed out");
        }
        guard.logout(&mut self.sessions)
    }

    /// Resolves a single mount without following redirects.
    pub fn mount(&mut self, route: &Route) -> Outcome<'f> {
        let Some(access) = route.access() else {
            return Outcome::Render(View::Login {
                hint: credentials::demo_hint(),
            });
        };

        let mut guard = RoleGuard::new(access);
        guard.check(&mut self.sessions);
        let user = match guard.state() {
            GuardState::Authorized(user) => user.clone(),
            GuardState::Redirecting(target) => return Outcome::Redirect(target.clone()),
            GuardState::Checking => return Outcome::Redirect(Route::Login),
        };

        let fixtures = self.fixtures;
        let view = match route {
            Route::Root => return Outcome::Redirect(dashboard_for(user.role)),
            Route::FacultyDashboard => {
                View::FacultyDashboard(FacultyDashboard::build(user, fixtures))
            }
            Route::FacultyStudent(id) => View::StudentDetail(StudentDetail::build(fixtures, id)),
            Route::StudentDashboard => {
                View::StudentDashboard(StudentDashboard::build(user, fixtures))
            }
            Route::Login => View::Login {
                hint: credentials::demo_hint(),
            },
        };
        Outcome::Render(view)
    }

    /// Opens a route and follows redirects to the view that finally renders.
    pub fn open(&mut self, route: Route) -> Result<(Route, View<'f>), NavigationError> {
        let mut current = route.clone();

        for _ in 0..=MAX_REDIRECTS {
            match self.mount(&current) {
                Outcome::Render(view) => return Ok((current, view)),
                Outcome::Redirect(next) => {
                    tracing::debug!(from = %current, to = %next, "redirect");
                    current = next;
                }
            }
        }

        Err(NavigationError::TooManyRedirects(route))
    }

    /// Faculty-only listing of the loaded records, optionally by status.
    pub fn roster(&mut self, status: Option<RiskStatus>) -> Outcome<'f> {
        let mut guard = RoleGuard::new(Access::Role(Role::Faculty));
        if let GuardState::Redirecting(target) = guard.check(&mut self.sessions) {
            return Outcome::Redirect(target.clone());
        }

        let students = match status {
            Some(status) => views::students_with_status(&self.fixtures.students, status),
            None => self.fixtures.students.iter().collect(),
        };
        Outcome::Render(View::Roster { status, students })
    }
}
