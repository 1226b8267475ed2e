//! One-shot notices carried across a redirect.

use tower_sessions::Session;

use storeadmin_core::Notice;

use crate::models::session_keys;

/// Store a notice for the next page view.
pub async fn set_flash(session: &Session, notice: &Notice) {
    if let Err(e) = session.insert(session_keys::FLASH, notice).await {
        tracing::warn!(error = %e, "failed to store flash notice");
    }
}

/// Take the pending notice, if any. It is shown once.
pub async fn take_flash(session: &Session) -> Option<Notice> {
    session
        .remove::<Notice>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}
