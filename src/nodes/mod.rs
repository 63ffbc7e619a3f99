//! The workflow node set.
//!
//! One module per step of the conversational workflow. Each node owns the
//! collaborators it needs and converts their failures into user-facing
//! messages; only engine-level invariant violations surface as
//! [`NodeError`](crate::node::NodeError).

mod clarify_request;
mod classify_intent;
mod collect_info;
mod end;
mod greeting;
mod prompt_missing_details;
mod retry_approval;
mod schedule;
mod seek_more_info;

pub use clarify_request::ClarifyRequestNode;
pub use classify_intent::ClassifyIntentNode;
pub use collect_info::CollectInfoNode;
pub use end::EndNode;
pub use greeting::GreetingNode;
pub use prompt_missing_details::PromptMissingDetailsNode;
pub use retry_approval::RetryApprovalNode;
pub use schedule::ScheduleNode;
pub use seek_more_info::SeekMoreInfoNode;
