//! Route Table
//!
//! Every page of the portal with its path and the roles allowed to
//! render it.

use derive_more::Display;
use kernel::id::PatientId;

use crate::domain::value_object::role::Role;
use crate::presentation::route_guard::RoleRequirement;

const REGISTRARS: &[Role] = &[Role::Secretario, Role::Administrador];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Route {
    #[display("/login")]
    Login,
    #[display("/")]
    Home,
    #[display("/citas")]
    Appointments,
    /// The logged-in patient's own clinical history
    #[display("/historial")]
    OwnHistory,
    /// A patient's clinical history as seen by their doctor
    #[display("/pacientes/{_0}/historial")]
    PatientHistory(PatientId),
    #[display("/registro")]
    Registration,
    #[display("/usuarios")]
    Users,
    #[display("/auditoria")]
    AuditLogs,
}

impl Route {
    /// Routes that take no parameters, in menu order
    pub const STATIC: [Route; 7] = [
        Route::Login,
        Route::Home,
        Route::Appointments,
        Route::OwnHistory,
        Route::Registration,
        Route::Users,
        Route::AuditLogs,
    ];

    pub fn path(&self) -> String {
        self.to_string()
    }

    /// `None` for public pages
    pub fn requirement(&self) -> Option<RoleRequirement> {
        use Route::*;
        match self {
            Login => None,
            Home | Appointments => Some(RoleRequirement::Any),
            OwnHistory => Some(RoleRequirement::Only(Role::Paciente)),
            PatientHistory(_) => Some(RoleRequirement::Only(Role::Medico)),
            Registration => Some(RoleRequirement::OneOf(REGISTRARS)),
            Users | AuditLogs => Some(RoleRequirement::Only(Role::Administrador)),
        }
    }

    pub fn title(&self) -> &'static str {
        use Route::*;
        match self {
            Login => "Iniciar sesión",
            Home => "Inicio",
            Appointments => "Citas",
            OwnHistory => "Mi historial",
            PatientHistory(_) => "Historial del paciente",
            Registration => "Registrar usuario",
            Users => "Usuarios",
            AuditLogs => "Auditoría",
        }
    }

    /// Resolve a concrete path (query string and trailing slash ignored)
    pub fn resolve(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };

        if let Some(route) = Self::STATIC.into_iter().find(|r| r.path() == trimmed) {
            return Some(route);
        }

        let rest = trimmed.strip_prefix("/pacientes/")?;
        let id = rest.strip_suffix("/historial")?;
        id.parse().ok().map(Route::PatientHistory)
    }
}
