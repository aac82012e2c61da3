use serde::{Deserialize, Serialize};
use std::fmt;

/// The four Sirona roles
///
/// Wire codes are the Spanish names exactly as the API issues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Medico,
    Paciente,
    Secretario,
    Administrador,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Medico,
        Role::Paciente,
        Role::Secretario,
        Role::Administrador,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Medico => "Médico",
            Paciente => "Paciente",
            Secretario => "Secretario",
            Administrador => "Administrador",
        }
    }

    /// Parse a role code
    ///
    /// Accepts the canonical code plus case-insensitive and unaccented
    /// spellings (`medico`, `MÉDICO`). Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        let folded: String = code
            .trim()
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();

        match folded.as_str() {
            "medico" => Some(Role::Medico),
            "paciente" => Some(Role::Paciente),
            "secretario" => Some(Role::Secretario),
            "administrador" => Some(Role::Administrador),
            _ => None,
        }
    }

    /// Accent colour of the role's theme
    #[inline]
    pub const fn theme_color(&self) -> &'static str {
        use Role::*;
        match self {
            Medico => "#1e88e5",
            Paciente => "#43a047",
            Secretario => "#fb8c00",
            Administrador => "#8e24aa",
        }
    }

    /// Roles allowed to see clinical histories at all
    #[inline]
    pub const fn can_view_clinical_history(&self) -> bool {
        matches!(self, Role::Medico | Role::Paciente)
    }

    /// Roles that create doctor and patient accounts
    #[inline]
    pub const fn can_register_users(&self) -> bool {
        matches!(self, Role::Secretario | Role::Administrador)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Administrador)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Role::from_code(&code).ok_or_else(|| format!("unknown role: {code}"))
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.code().to_string()
    }
}
