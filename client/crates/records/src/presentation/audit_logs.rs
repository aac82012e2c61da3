//! Audit Log Page Controller
//!
//! Paged, filtered view of the audit trail for Administrador.

use std::sync::Arc;

use auth::Session;
use chrono::NaiveDate;

use crate::application::{RecordsConfig, Resource};
use crate::domain::entities::AuditPage;
use crate::domain::repository::AuditLogRepository;
use crate::domain::value_objects::AuditQuery;
use crate::error::{RecordsError, RecordsResult};
use crate::presentation::{FormStatus, bearer_for_role};

/// Filter form as typed; dates are `YYYY-MM-DD`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilterForm {
    pub user: String,
    pub action: String,
    pub from: String,
    pub to: String,
}

impl AuditFilterForm {
    fn to_query(&self, page: u32, page_size: u32) -> RecordsResult<AuditQuery> {
        let from = parse_date("from", &self.from)?;
        let to = parse_date("to", &self.to)?;
        AuditQuery::new(page, page_size, &self.user, &self.action, from, to)
    }
}

fn parse_date(field: &'static str, raw: &str) -> RecordsResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| RecordsError::invalid(field, "Fecha inválida (AAAA-MM-DD)"))
}

pub struct AuditLogsController<R: AuditLogRepository> {
    repo: Arc<R>,
    page_size: u32,
    /// Query behind the page on screen
    query: Option<AuditQuery>,
    pub filter: AuditFilterForm,
    pub page: Resource<AuditPage>,
    status: FormStatus,
}

impl<R: AuditLogRepository> AuditLogsController<R> {
    pub fn new(repo: Arc<R>, config: &RecordsConfig) -> Self {
        Self {
            repo,
            page_size: config.audit_page_size,
            query: None,
            filter: AuditFilterForm::default(),
            page: Resource::Idle,
            status: FormStatus::default(),
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn requires_reauth(&self) -> bool {
        self.page.requires_reauth()
    }

    pub fn current_page(&self) -> u32 {
        self.query.as_ref().map_or(1, |q| q.page)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn mount(&mut self, session: &Session) {
        self.apply_filter(session).await;
    }

    /// Validate the filter and show its first page
    pub async fn apply_filter(&mut self, session: &Session) -> bool {
        self.goto(session, 1).await
    }

    /// Change the page size and restart from the first page
    pub async fn set_page_size(&mut self, session: &Session, page_size: u32) -> bool {
        let previous = self.page_size;
        self.page_size = page_size;
        let ok = self.goto(session, 1).await;
        if !ok {
            self.page_size = previous;
        }
        ok
    }

    pub async fn next_page(&mut self, session: &Session) -> bool {
        if !self.page.data().is_some_and(AuditPage::has_next) {
            return false;
        }
        let page = self.current_page() + 1;
        self.goto(session, page).await
    }

    pub async fn previous_page(&mut self, session: &Session) -> bool {
        if !self.page.data().is_some_and(AuditPage::has_previous) {
            return false;
        }
        let page = self.current_page().saturating_sub(1).max(1);
        self.goto(session, page).await
    }

    /// Fetch `page` with the current filter; `false` when validation fails
    async fn goto(&mut self, session: &Session, page: u32) -> bool {
        self.status.clear();
        let query = match self.filter.to_query(page, self.page_size) {
            Ok(query) => query,
            Err(e) => {
                self.status.fail(e);
                return false;
            }
        };

        let repo = &self.repo;
        match bearer_for_role(session, |role| role.is_admin()) {
            Ok(bearer) => {
                let q = &query;
                self.page.load(|| repo.page(bearer, q)).await;
            }
            Err(e) => self.page.finish(Err(e)),
        }
        self.query = Some(query);
        self.page.data().is_some()
    }
}
