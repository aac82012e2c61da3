//! User Management Page Controller
//!
//! Administrador only: lists accounts, filters them locally, toggles
//! their active flag and registers new doctors and patients.

use std::sync::Arc;

use auth::{AuthGateway, Role, Session};
use kernel::id::UserAccountId;

use crate::application::Resource;
use crate::domain::entities::UserAccount;
use crate::domain::repository::UserRepository;
use crate::domain::value_objects::UserFilter;
use crate::error::{RecordsError, RecordsResult};
use crate::presentation::registration::RegistrationController;
use crate::presentation::{FormStatus, bearer_for_role};

pub struct UserManagementController<R: UserRepository, G: AuthGateway> {
    repo: Arc<R>,
    pub users: Resource<Vec<UserAccount>>,
    pub filter: UserFilter,
    pub registration: RegistrationController<G>,
    status: FormStatus,
}

impl<R: UserRepository, G: AuthGateway> UserManagementController<R, G> {
    pub fn new(repo: Arc<R>, gateway: Arc<G>) -> Self {
        Self {
            repo,
            users: Resource::Idle,
            filter: UserFilter::default(),
            registration: RegistrationController::new(gateway),
            status: FormStatus::default(),
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn requires_reauth(&self) -> bool {
        self.users.requires_reauth()
            || self.status.requires_reauth()
            || self.registration.status().requires_reauth()
    }

    pub async fn mount(&mut self, session: &Session) {
        self.refresh(session).await;
    }

    pub async fn refresh(&mut self, session: &Session) {
        let repo = &self.repo;
        match bearer_for_role(session, |role| role.is_admin()) {
            Ok(bearer) => self.users.load(|| repo.list(bearer)).await,
            Err(e) => self.users.finish(Err(e)),
        }
    }

    /// Loaded users passing the current filter
    pub fn visible_users(&self) -> Vec<&UserAccount> {
        self.users
            .data()
            .map(|users| users.iter().filter(|u| self.filter.matches(u)).collect())
            .unwrap_or_default()
    }

    /// Count of loaded users per role
    pub fn count_by_role(&self, role: Role) -> usize {
        self.users
            .data()
            .map_or(0, |users| users.iter().filter(|u| u.role == role).count())
    }

    /// Activate or deactivate an account; `true` on success
    ///
    /// An administrator cannot deactivate their own account.
    pub async fn set_active(&mut self, session: &Session, id: UserAccountId, active: bool) -> bool {
        if !self.status.begin() {
            return false;
        }

        match self.toggle(session, id, active).await {
            Ok(email) => {
                let verb = if active { "activada" } else { "desactivada" };
                tracing::info!(user_id = %id, active, "User status changed");
                self.status.succeed(format!("Cuenta {verb}: {email}"));
                self.refresh(session).await;
                true
            }
            Err(e) => {
                self.status.fail(e);
                false
            }
        }
    }

    async fn toggle(&self, session: &Session, id: UserAccountId, active: bool) -> RecordsResult<String> {
        let bearer = bearer_for_role(session, |role| role.is_admin())?;
        let user = self
            .users
            .data()
            .and_then(|users| users.iter().find(|u| u.id == id))
            .ok_or_else(|| RecordsError::NotFound("Usuario no encontrado".to_string()))?;

        let own_email = session.user().map(|u| u.email.as_str());
        if !active && own_email.is_some_and(|own| own.eq_ignore_ascii_case(&user.email)) {
            return Err(RecordsError::Validation(
                "No puede desactivar su propia cuenta".to_string(),
            ));
        }

        self.repo.set_active(bearer, id, active).await?;
        Ok(user.email.clone())
    }

    /// Register through the embedded form, then reload the list
    pub async fn register_doctor(&mut self, session: &Session) -> bool {
        let created = self.registration.register_doctor(session).await;
        if created {
            self.refresh(session).await;
        }
        created
    }

    pub async fn register_patient(&mut self, session: &Session) -> bool {
        let created = self.registration.register_patient(session).await;
        if created {
            self.refresh(session).await;
        }
        created
    }
}
