//! Response envelopes for UI and dashboard consumers.
//!
//! Form handlers and admin actions hand crate results to the page layer in
//! these shapes; field names are camelCase to match the consumer contract.

use serde::Serialize;

use crate::application::queue::QueueStatus;
use crate::domain::receipt::{PaymentReceipt, ReceiptId};
use crate::error::RealtimeError;

/// Maps an error to the message shown to the person who triggered it.
///
/// A double decision is an expected concurrent-admin race, so it gets a
/// specific message instead of a generic failure.
pub fn user_message(error: &RealtimeError) -> String {
    match error {
        RealtimeError::AlreadyDecided { .. } => {
            "This payment has already been reviewed.".to_string()
        }
        RealtimeError::ReceiptNotFound(_) => "Payment receipt not found.".to_string(),
        RealtimeError::Validation(reason) => reason.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<ReceiptId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<crate::error::Result<PaymentReceipt>> for SubmitPaymentResponse {
    fn from(result: crate::error::Result<PaymentReceipt>) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                receipt_id: Some(receipt.id),
                error: None,
            },
            Err(error) => Self {
                success: false,
                receipt_id: None,
                error: Some(user_message(&error)),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecidePaymentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<PaymentReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<crate::error::Result<PaymentReceipt>> for DecidePaymentResponse {
    fn from(result: crate::error::Result<PaymentReceipt>) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                receipt: Some(receipt),
                error: None,
            },
            Err(error) => Self {
                success: false,
                receipt: None,
                error: Some(user_message(&error)),
            },
        }
    }
}

/// Re-exported here so dashboard consumers find the whole contract in one
/// place.
pub type QueueStatusResponse = QueueStatus;
