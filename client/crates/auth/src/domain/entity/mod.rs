pub mod session;
pub mod user_summary;

pub use session::{PendingMfaChallenge, Session};
pub use user_summary::UserSummary;
