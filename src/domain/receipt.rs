use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{RealtimeError, Result};

/// Unique identifier of a submitted payment receipt, generated at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(Uuid);

impl ReceiptId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A positive amount in the smallest currency unit.
///
/// This is a wrapper around `i64` to enforce domain-specific rules
/// and provide type safety for monetary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(RealtimeError::Validation(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = RealtimeError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReceiptStatus {
    /// A terminal status permits no further transition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Outcome an admin selects when reviewing a pending receipt.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn status(self) -> ReceiptStatus {
        match self {
            Self::Approved => ReceiptStatus::Approved,
            Self::Rejected => ReceiptStatus::Rejected,
        }
    }
}

/// A payment submission from the upgrade form, not yet validated.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SubmitPayment {
    pub user_id: String,
    pub plan_type: String,
    pub amount: i64,
    pub receipt_reference: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// One submitted proof-of-payment awaiting admin review.
///
/// Status moves `pending -> approved` or `pending -> rejected` exactly once;
/// `decided_at` and `admin_notes` are set only on that transition.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentReceipt {
    pub id: ReceiptId,
    pub user_id: String,
    pub plan_type: String,
    pub amount: Amount,
    /// Opaque pointer to the uploaded artifact; never interpreted here.
    pub receipt_reference: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub status: ReceiptStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl PaymentReceipt {
    /// Validates a submission and builds the pending receipt.
    pub fn from_submission(submission: SubmitPayment) -> Result<Self> {
        let amount = Amount::new(submission.amount)?;
        if submission.user_id.trim().is_empty() {
            return Err(RealtimeError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }
        if submission.plan_type.trim().is_empty() {
            return Err(RealtimeError::Validation(
                "plan_type must not be empty".to_string(),
            ));
        }
        if submission.receipt_reference.trim().is_empty() {
            return Err(RealtimeError::Validation(
                "receipt_reference must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id: ReceiptId::generate(),
            user_id: submission.user_id,
            plan_type: submission.plan_type,
            amount,
            receipt_reference: submission.receipt_reference,
            user_name: submission.user_name,
            user_email: submission.user_email,
            status: ReceiptStatus::Pending,
            admin_notes: None,
            created_at: Utc::now(),
            decided_at: None,
        })
    }

    /// Applies the terminal transition if the receipt is still pending.
    pub fn decide(
        &mut self,
        decision: Decision,
        admin_notes: Option<String>,
        decided_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.status.is_terminal() {
            return Err(RealtimeError::AlreadyDecided {
                id: self.id,
                status: self.status,
            });
        }
        self.status = decision.status();
        self.admin_notes = admin_notes;
        self.decided_at = Some(decided_at);
        Ok(())
    }
}
