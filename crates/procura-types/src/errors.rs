//! Error types for the procurement workflow

use crate::{ApprovalLevel, Role};

/// Errors that can occur in workflow operations.
///
/// Every failing operation leaves document state untouched; there is no
/// partially applied transition.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document was already submitted")]
    AlreadySubmitted,

    #[error("Approval level mismatch: active gate is {expected:?}, got {got}")]
    WrongLevel {
        expected: Option<ApprovalLevel>,
        got: ApprovalLevel,
    },

    #[error("Role {role} may not approve at level {level}")]
    NotAuthorized { role: Role, level: ApprovalLevel },

    #[error("Submitter cannot approve their own document")]
    SelfApproval,

    #[error("Role {0} is read-only")]
    ReadOnly(Role),

    #[error("Document is not approved")]
    NotApproved,
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
