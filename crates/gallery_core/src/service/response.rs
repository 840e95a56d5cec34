//! Status vocabulary shared by every gallery service.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    NotFound,
    Created,
    Updated,
    Deleted,
    Error,
    /// Requested link already in place; nothing was written.
    AlreadyExists,
    /// Artwork is not a member of the category it was unlinked from.
    NotLinked,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Error => "error",
            Self::AlreadyExists => "already_exists",
            Self::NotLinked => "not_linked",
        }
    }
}

/// Outcome of a service operation: status, the new id for `Created`, and
/// human-readable messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub status: ServiceStatus,
    pub created_id: Option<i64>,
    pub messages: Vec<String>,
}

impl ServiceResponse {
    fn with_status(status: ServiceStatus) -> Self {
        Self {
            status,
            created_id: None,
            messages: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::NotFound).with_message(message)
    }

    pub fn created(id: i64) -> Self {
        Self {
            created_id: Some(id),
            ..Self::with_status(ServiceStatus::Created)
        }
    }

    pub fn updated() -> Self {
        Self::with_status(ServiceStatus::Updated)
    }

    pub fn deleted() -> Self {
        Self::with_status(ServiceStatus::Deleted)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::Error).with_message(message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::AlreadyExists).with_message(message)
    }

    pub fn not_linked(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::NotLinked).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// `true` for statuses that report a completed write.
    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            ServiceStatus::Created | ServiceStatus::Updated | ServiceStatus::Deleted
        )
    }
}

impl Display for ServiceResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status.as_str())?;
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        Ok(())
    }
}
