//! Structured suspension requests raised by nodes.
//!
//! An [`Interrupt`] captures the question a node needs answered before the
//! workflow can continue. The engine persists it alongside the checkpoint,
//! hands it to the caller, and feeds the caller's reply back verbatim as the
//! resume value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two interrupt kinds used by the current node set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptKind {
    /// A side-effecting operation failed and the user must choose between
    /// retrying and cancelling.
    OperationApproval,
    /// Required fields are missing after an extraction attempt and the user
    /// must supply more information.
    SeekMoreInfo,
}

impl fmt::Display for InterruptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptKind::OperationApproval => f.write_str("operation_approval"),
            InterruptKind::SeekMoreInfo => f.write_str("seek_more_info"),
        }
    }
}

/// A suspension request: the question owed to the caller plus metadata.
///
/// `operation_approval` interrupts always carry exactly the options
/// `["retry", "cancel"]`; `seek_more_info` interrupts carry none.
///
/// # Examples
///
/// ```
/// use confab::interrupt::{Interrupt, InterruptKind};
///
/// let approval = Interrupt::operation_approval(
///     "Meeting scheduling failed.",
///     "Would you like to retry this operation?",
/// );
/// assert_eq!(approval.kind, InterruptKind::OperationApproval);
/// assert_eq!(approval.options, vec!["retry", "cancel"]);
///
/// let ask = Interrupt::seek_more_info(
///     "Need more information to schedule the meeting",
///     "What time should the meeting start?",
/// );
/// assert!(ask.options.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interrupt {
    pub kind: InterruptKind,
    /// Short operator-facing description of why execution stopped.
    pub message: String,
    /// The question presented to the user.
    pub question: String,
    /// Accepted answers, when the interrupt is a closed choice.
    #[serde(default)]
    pub options: Vec<String>,
}

impl Interrupt {
    /// Fixed option set for operation approval interrupts.
    pub const APPROVAL_OPTIONS: [&'static str; 2] = ["retry", "cancel"];

    /// Builds an `operation_approval` interrupt with the fixed
    /// retry/cancel option pair.
    #[must_use]
    pub fn operation_approval(message: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            kind: InterruptKind::OperationApproval,
            message: message.into(),
            question: question.into(),
            options: Self::APPROVAL_OPTIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Builds a `seek_more_info` interrupt (free-form answer, no options).
    #[must_use]
    pub fn seek_more_info(message: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            kind: InterruptKind::SeekMoreInfo,
            message: message.into(),
            question: question.into(),
            options: Vec::new(),
        }
    }
}
