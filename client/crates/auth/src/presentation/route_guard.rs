//! Route Guard
//!
//! Decides, for the current session and a requested path, whether the
//! page renders or what happens instead. Pure: no I/O, no state.
//!
//! Clinical history is off-limits to Secretario regardless of what the
//! route declares, so that a misconfigured route cannot leak it.

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::value_object::role::Role;
use crate::presentation::routes::Route;

/// Path fragment marking clinical-history pages
const CLINICAL_HISTORY_SEGMENT: &str = "/historial";

/// Roles a page accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any authenticated role
    Any,
    Only(Role),
    OneOf(&'static [Role]),
}

impl RoleRequirement {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            RoleRequirement::Any => true,
            RoleRequirement::Only(required) => *required == role,
            RoleRequirement::OneOf(roles) => roles.contains(&role),
        }
    }
}

impl From<Option<Role>> for RoleRequirement {
    fn from(role: Option<Role>) -> Self {
        role.map_or(RoleRequirement::Any, RoleRequirement::Only)
    }
}

impl From<Role> for RoleRequirement {
    fn from(role: Role) -> Self {
        RoleRequirement::Only(role)
    }
}

/// The three states the guard distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Unauthenticated,
    Authenticated(Role),
}

impl From<&Session> for GuardState {
    fn from(session: &Session) -> Self {
        if session.is_loading() {
            return GuardState::Loading;
        }
        match (session.is_authenticated(), session.role()) {
            (true, Some(role)) => GuardState::Authenticated(role),
            _ => GuardState::Unauthenticated,
        }
    }
}

/// Content of the access-denied page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenView {
    pub role: Role,
    pub title: &'static str,
    pub message: &'static str,
    pub theme_color: &'static str,
}

impl ForbiddenView {
    pub fn for_role(role: Role) -> Self {
        let message = match role {
            Role::Secretario => {
                "El personal administrativo no tiene acceso a historiales clínicos."
            }
            Role::Paciente => "Solo puede consultar su propio historial clínico.",
            Role::Medico => "Esta sección no está disponible para personal médico.",
            Role::Administrador => "Esta sección no está disponible.",
        };
        Self {
            role,
            title: "Acceso denegado",
            message,
            theme_color: role.theme_color(),
        }
    }
}

/// What to do with a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still resolving: placeholder, no children, no redirect
    ShowLoading,
    RedirectToLogin,
    Forbidden(ForbiddenView),
    RedirectHome,
    Render,
}

/// `true` when `path` shows clinical history
pub fn is_clinical_history_path(path: &str) -> bool {
    path.to_lowercase().contains(CLINICAL_HISTORY_SEGMENT)
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: AuthConfig,
}

impl RouteGuard {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Decide for a raw path and an explicit requirement
    pub fn check(
        &self,
        session: &Session,
        path: &str,
        requirement: impl Into<RoleRequirement>,
    ) -> GuardOutcome {
        let requirement = requirement.into();

        let role = match GuardState::from(session) {
            GuardState::Loading => return GuardOutcome::ShowLoading,
            GuardState::Unauthenticated => {
                tracing::debug!(path = %path, "Unauthenticated; redirecting to login");
                return GuardOutcome::RedirectToLogin;
            }
            GuardState::Authenticated(role) => role,
        };

        if role == Role::Secretario && is_clinical_history_path(path) {
            tracing::warn!(role = %role, path = %path, "Clinical history blocked for role");
            return GuardOutcome::Forbidden(ForbiddenView::for_role(role));
        }

        if !requirement.allows(role) {
            tracing::debug!(role = %role, path = %path, "Role not allowed; redirecting home");
            return GuardOutcome::RedirectHome;
        }

        GuardOutcome::Render
    }

    /// Decide for a known route; public routes always render
    pub fn check_route(&self, session: &Session, route: &Route) -> GuardOutcome {
        match route.requirement() {
            Some(requirement) => self.check(session, &route.path(), requirement),
            None => GuardOutcome::Render,
        }
    }

    /// Where a redirect outcome leads
    pub fn redirect_target(&self, outcome: &GuardOutcome) -> Option<&str> {
        match outcome {
            GuardOutcome::RedirectToLogin => Some(&self.config.login_path),
            GuardOutcome::RedirectHome => Some(&self.config.home_path),
            _ => None,
        }
    }
}
