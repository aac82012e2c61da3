//! Resource Loader
//!
//! One fetch/loading/error state machine shared by every page. A page
//! owns a `Resource<T>` per remote list, starts it on mount and again
//! after a mutation or a manual refresh. There is no automatic retry.

use std::future::Future;

use kernel::error::app_error::AppError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Resource<T> {
    /// Never fetched
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(AppError),
}

impl<T> Resource<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Resource::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Resource::Error(err) => Some(err),
            _ => None,
        }
    }

    /// The last fetch was answered 401: the caller should log out
    pub fn requires_reauth(&self) -> bool {
        self.error().is_some_and(AppError::requires_reauth)
    }

    /// Enter `Loading`
    pub fn start(&mut self) {
        *self = Resource::Loading;
    }

    /// Leave `Loading` with the fetch result
    pub fn finish<E: Into<AppError>>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(data) => Resource::Success(data),
            Err(err) => Resource::Error(err.into()),
        };
    }

    /// Run `fetch` and store its outcome
    pub async fn load<F, Fut, E>(&mut self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<AppError>,
    {
        self.start();
        let result = fetch().await;
        self.finish(result);
    }
}
