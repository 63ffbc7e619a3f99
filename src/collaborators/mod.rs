//! External collaborator contracts.
//!
//! Nodes never talk to the outside world directly: text generation, intent
//! classification, detail extraction, and calendar booking all go through
//! the traits defined here. The engine's correctness contract stops at this
//! boundary - a collaborator may time out, hit a quota, or reject a
//! credential, and the calling node is responsible for catching the error
//! and degrading to a user-facing message.
//!
//! Deterministic, network-free implementations live in [`offline`]; they
//! are the default wiring and what the test suite runs against. LLM- or
//! API-backed implementations plug in by implementing the same traits.

use async_trait::async_trait;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::details::EventDetails;
use crate::prompts::PromptTemplate;
use crate::state::UserIntent;

pub mod offline;

/// Errors surfaced by collaborator calls.
///
/// Nodes treat every variant uniformly: catch, log, degrade. The variants
/// exist so logs and diagnostics can tell a timeout from an auth failure.
#[derive(Debug, Error, Diagnostic)]
pub enum CollaboratorError {
    /// The provider returned an error response.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(confab::collaborator::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// The provider did not answer in time.
    #[error("provider timeout ({provider})")]
    #[diagnostic(
        code(confab::collaborator::timeout),
        help("The collaborator call exceeded its deadline; the node should degrade gracefully.")
    )]
    Timeout { provider: &'static str },

    /// Missing or invalid credentials for the call.
    #[error("authentication failed: {message}")]
    #[diagnostic(code(confab::collaborator::auth))]
    Auth { message: String },
}

/// Classifies a user utterance into a [`UserIntent`].
///
/// Implementations must map undecidable inputs to `Ok(UserIntent::Unknown)`
/// where possible; nodes additionally map `Err` to `Unknown` so a failure
/// never escapes the node boundary.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<UserIntent, CollaboratorError>;
}

/// Produces assistant-facing text from a prompt template and variables.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        template: PromptTemplate,
        vars: &FxHashMap<String, String>,
    ) -> Result<String, CollaboratorError>;
}

/// Extracts event details from a user utterance.
///
/// `current` is the record collected so far; implementations may use it for
/// context but must return only what the utterance itself supports - the
/// calling node performs the monotonic merge.
#[async_trait]
pub trait DetailExtractor: Send + Sync {
    async fn extract(
        &self,
        utterance: &str,
        current: &EventDetails,
    ) -> Result<EventDetails, CollaboratorError>;
}

/// Result of a successful booking call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub event_id: String,
    pub event_link: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

/// Books an event against the user's calendar.
///
/// `credential_ref` identifies the stored credentials for the session (the
/// engine passes the session id); resolving it to an actual token is the
/// implementation's concern. Any failure - auth, quota, network - is
/// reported through `CollaboratorError` and handled uniformly by the
/// scheduling node.
#[async_trait]
pub trait Calendar: Send + Sync {
    async fn book(
        &self,
        credential_ref: &str,
        details: &EventDetails,
    ) -> Result<BookingConfirmation, CollaboratorError>;
}
