//! Decided results of validated mutations.
//!
//! Rejections are ordinary data: they are returned to the caller, never raised
//! as errors, and carry a stable numeric code the UI uses to focus the
//! offending field.

use super::category::CategoryId;

/// Field-oriented rejection codes shared with the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCode {
    /// The name field (bookmark name, or new category name).
    Name = 1,
    Url = 2,
    Category = 3,
}

impl RejectionCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub code: RejectionCode,
    pub message: String,
}

/// What happened to a submitted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Validated and written.
    Accepted,
    /// Nothing differs from what is stored; no write was issued.
    Unchanged(String),
    Rejected(Rejection),
}

impl Outcome {
    pub fn rejected(code: RejectionCode, message: impl Into<String>) -> Self {
        Outcome::Rejected(Rejection {
            code,
            message: message.into(),
        })
    }

    /// Accepted and unchanged both count as success for the caller.
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }

    /// The rejection code, `0` when the outcome is not a rejection.
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Rejected(rejection) => rejection.code.as_i32(),
            _ => 0,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Accepted => None,
            Outcome::Unchanged(message) => Some(message),
            Outcome::Rejected(rejection) => Some(&rejection.message),
        }
    }
}

/// The coordinator's decision for an add or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Write the draft, filing it under `category` (`None` = uncategorized).
    Proceed { category: Option<CategoryId> },
    /// Stop here and report this outcome without writing.
    Conclude(Outcome),
}
