//! Role Navigation
//!
//! Menu entries for the logged-in role. Only pages the guard would render
//! are listed.

use crate::domain::entity::session::Session;
use crate::presentation::route_guard::{GuardOutcome, RouteGuard};
use crate::presentation::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
}

/// Menu for `session`, empty unless authenticated
pub fn navigation_for(guard: &RouteGuard, session: &Session) -> Vec<NavItem> {
    if !session.is_authenticated() {
        return Vec::new();
    }
    Route::STATIC
        .into_iter()
        .filter(|route| *route != Route::Login)
        .filter(|route| guard.check_route(session, route) == GuardOutcome::Render)
        .map(|route| NavItem {
            route,
            label: route.title(),
        })
        .collect()
}

/// Header greeting, e.g. `Médico · Dra. Elena García`
pub fn header_for(session: &Session) -> Option<(String, &'static str)> {
    let user = session.user()?;
    let role = user.role;
    Some((
        format!("{} · {}", role, user.full_name),
        role.theme_color(),
    ))
}
