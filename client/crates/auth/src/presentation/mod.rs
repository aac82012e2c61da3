//! Presentation Layer
//!
//! Route table, route guard, role navigation and page controllers.

pub mod login_controller;
pub mod navigation;
pub mod route_guard;
pub mod routes;

pub use login_controller::{Banner, FieldError, LoginController, LoginMode};
pub use navigation::{NavItem, header_for, navigation_for};
pub use route_guard::{
    ForbiddenView, GuardOutcome, GuardState, RoleRequirement, RouteGuard, is_clinical_history_path,
};
pub use routes::Route;
