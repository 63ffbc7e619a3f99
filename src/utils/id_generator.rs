//! ID generation utilities for session identifiers.
//!
//! Sessions are keyed by caller-provided identifiers; this helper exists
//! for callers (and tests) that want a fresh, collision-free one.

use uuid::Uuid;

/// Generate a unique session identifier.
///
/// # Examples
///
/// ```
/// use confab::utils::id_generator::new_session_id;
///
/// let a = new_session_id();
/// let b = new_session_id();
/// assert!(a.starts_with("session-"));
/// assert_ne!(a, b);
/// ```
#[must_use]
pub fn new_session_id() -> String {
    format!("session-{}", Uuid::new_v4())
}
