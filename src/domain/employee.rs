use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{RealtimeError, Result};

/// Unique identifier of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fields collected by the badge form for a new employee.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub badge_code: String,
}

/// An employee record as stored by the persistence collaborator.
///
/// The coordination core only forwards these as event payloads; the fields
/// are whatever the badge printer needs.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub badge_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeRecord {
    /// Validates the form fields and builds a fresh record.
    pub fn create(new: NewEmployee) -> Result<Self> {
        if new.full_name.trim().is_empty() {
            return Err(RealtimeError::Validation(
                "full_name must not be empty".to_string(),
            ));
        }
        if new.email.trim().is_empty() {
            return Err(RealtimeError::Validation(
                "email must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: EmployeeId::generate(),
            full_name: new.full_name,
            email: new.email,
            phone: new.phone,
            department: new.department,
            badge_code: new.badge_code,
            created_at: now,
            updated_at: now,
        })
    }
}
