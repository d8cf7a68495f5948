//! Department records.

use chrono::{DateTime, Utc};

use super::{DepartmentId, DepartmentName};

/// Persisted department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    /// Primary key.
    pub id: DepartmentId,
    /// Display name.
    pub name: DepartmentName,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Department summary embedded in employee aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSummary {
    /// Primary key.
    pub id: DepartmentId,
    /// Display name.
    pub name: DepartmentName,
}

impl From<&Department> for DepartmentSummary {
    fn from(value: &Department) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}
