//! Portal Entry Point
//!
//! Restores the stored session, reports which sections the user may
//! open and, when signed in, loads the appointments page once.
//! Uses `anyhow` for startup errors; everything below the binary reports
//! `AppError`.

use std::sync::Arc;

use auth::guard::{GuardOutcome, Route, RouteGuard, header_for, navigation_for};
use auth::{AuthConfig, Session, SessionStore};
use platform::config::ClientConfig;
use platform::storage::FileStorage;
use platform::transport::ReqwestTransport;
use records::controllers::AppointmentsController;
use records::{HttpRecordsApi, RecordsConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal=info,auth=info,records=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();
    let auth_config = AuthConfig::from(&config);
    tracing::info!(api = %config.api_base_url, storage = %config.storage_path.display(), "Starting portal");

    let mut store = SessionStore::new(FileStorage::new(config.storage_path.clone()), &auth_config);
    let session = store.initialize().clone();
    let guard = RouteGuard::new(auth_config);

    report_routes(&guard, &session);

    if !session.is_authenticated() {
        tracing::info!(path = %Route::Login, "No stored session; sign in to continue");
        return Ok(());
    }

    if let Some((greeting, color)) = header_for(&session) {
        tracing::info!(color, "{greeting}");
    }
    for item in navigation_for(&guard, &session) {
        tracing::info!(path = %item.route, label = item.label, "Menu entry");
    }

    if guard.check_route(&session, &Route::Appointments) != GuardOutcome::Render {
        return Ok(());
    }

    let transport = ReqwestTransport::new(&config)?;
    let api = Arc::new(HttpRecordsApi::new(transport));
    let mut appointments = AppointmentsController::new(api, RecordsConfig::default());
    appointments.mount(&session).await;

    if appointments.requires_reauth() {
        tracing::warn!("Stored session rejected by the server; signing out");
        store.logout();
        return Ok(());
    }

    match (appointments.appointments.data(), appointments.appointments.error()) {
        (Some(list), _) => {
            let upcoming = list.iter().filter(|a| a.can_cancel()).count();
            tracing::info!(total = list.len(), upcoming, "Appointments loaded");
        }
        (None, Some(e)) => tracing::warn!(kind = ?e.kind(), message = %e, "Appointments unavailable"),
        (None, None) => {}
    }

    Ok(())
}

/// Log the guard decision for every static route
fn report_routes(guard: &RouteGuard, session: &Session) {
    for route in Route::STATIC {
        match guard.check_route(session, &route) {
            GuardOutcome::Render => tracing::debug!(path = %route, "Route open"),
            GuardOutcome::Forbidden(view) => {
                tracing::debug!(path = %route, title = %view.title, "Route forbidden")
            }
            outcome => tracing::debug!(path = %route, outcome = ?outcome, "Route redirects"),
        }
    }
}
