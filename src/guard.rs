//! Route table and the per-mount role check that protects it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::{Role, User};
use crate::session::SessionManager;
use crate::storage::SlotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Root,
    FacultyDashboard,
    FacultyStudent(String),
    StudentDashboard,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("unknown route `{0}`")]
    UnknownRoute(String),
}

/// What a protected route demands of the session before it may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    AnySession,
    Role(Role),
}

impl Route {
    /// `None` for routes anyone may open.
    pub fn access(&self) -> Option<Access> {
        match self {
            Route::Login => None,
            Route::Root => Some(Access::AnySession),
            Route::FacultyDashboard | Route::FacultyStudent(_) => Some(Access::Role(Role::Faculty)),
            Route::StudentDashboard => Some(Access::Role(Role::Student)),
        }
    }
}

pub fn dashboard_for(role: Role) -> Route {
    match role {
        Role::Faculty => Route::FacultyDashboard,
        Role::Student => Route::StudentDashboard,
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.trim();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => return Ok(Route::Root),
            "/login" => return Ok(Route::Login),
            "/faculty/dashboard" => return Ok(Route::FacultyDashboard),
            "/student/dashboard" => return Ok(Route::StudentDashboard),
            _ => {}
        }

        match trimmed.strip_prefix("/faculty/student/") {
            Some(id) if !id.is_empty() && !id.contains('/') => {
                Ok(Route::FacultyStudent(id.to_string()))
            }
            _ => Err(RouteError::UnknownRoute(raw.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/login"),
            Route::Root => f.write_str("/"),
            Route::FacultyDashboard => f.write_str("/faculty/dashboard"),
            Route::FacultyStudent(id) => write!(f, "/faculty/student/{id}"),
            Route::StudentDashboard => f.write_str("/student/dashboard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    Checking,
    Redirecting(Route),
    Authorized(User),
}

/// Resolves once per mount. `check` never fails; every problem becomes a
/// redirect.
#[derive(Debug)]
pub struct RoleGuard {
    access: Access,
    state: GuardState,
}

impl RoleGuard {
    pub fn new(access: Access) -> Self {
        Self {
            access,
            state: GuardState::Checking,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Only available once the guard is `Authorized`.
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            GuardState::Authorized(user) => Some(user),
            _ => None,
        }
    }

    pub fn check<S: SlotStore>(&mut self, sessions: &mut SessionManager<S>) -> &GuardState {
        if self.state == GuardState::Checking {
            self.state = self.resolve(sessions);
        }
        &self.state
    }

    fn resolve<S: SlotStore>(&self, sessions: &mut SessionManager<S>) -> GuardState {
        let Some(user) = sessions.load_session() else {
            return GuardState::Redirecting(Route::Login);
        };

        match self.access {
            Access::Role(required) if user.role != required => {
                tracing::debug!(required = %required, actual = %user.role, "role mismatch");
                GuardState::Redirecting(dashboard_for(user.role))
            }
            _ => GuardState::Authorized(user),
        }
    }

    /// Clears the session and sends the mount to the login view. Safe in any
    /// state, and safe to repeat.
    pub fn logout<S: SlotStore>(&mut self, sessions: &mut SessionManager<S>) -> Route {
        if let Err(e) = sessions.clear_session() {
            tracing::error!(error = %e, "failed to clear session on logout");
        }
        self.state = GuardState::Redirecting(Route::Login);
        Route::Login
    }
}
