//! Acknowledgement envelopes shared by mutation endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned once a resource has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    #[schema(example = "Employee deleted successfully")]
    pub message: String,
}

impl DeletedResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
        }
    }
}

/// Body returned once a resource has been changed, carrying the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdatedResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    #[schema(example = "Department updated successfully")]
    pub message: String,
    /// Resource after the change.
    pub data: T,
}

impl<T> UpdatedResponse<T> {
    pub(crate) fn new(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
            data,
        }
    }
}
