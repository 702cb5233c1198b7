use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::bus::EventBus;
use crate::domain::event::EventPayload;
use crate::domain::ports::ReceiptStoreBox;
use crate::domain::receipt::{Decision, PaymentReceipt, ReceiptId, SubmitPayment};
use crate::error::Result;

/// Diagnostic snapshot of the review queue, shaped for dashboard consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub queue_length: usize,
    pub current_processing: usize,
}

/// The payment-receipt approval workflow.
///
/// Owns all receipt state through its [`ReceiptStoreBox`] and announces every
/// transition on the bus. Events are published only after the state mutation
/// has committed, so a subscriber fault can never leave the queue
/// inconsistent.
pub struct PaymentQueue {
    store: ReceiptStoreBox,
    bus: Arc<EventBus>,
    // In-flight decide() executions. Diagnostic only: a sustained non-zero
    // value points at a stuck admin action.
    processing: AtomicUsize,
}

impl PaymentQueue {
    pub fn new(store: ReceiptStoreBox, bus: Arc<EventBus>) -> Self {
        Self {
            store,
            bus,
            processing: AtomicUsize::new(0),
        }
    }

    /// Validates a submission, stores the pending receipt and publishes
    /// `payment_submitted`. Nothing is stored or published on a validation
    /// failure.
    pub async fn submit(&self, submission: SubmitPayment) -> Result<PaymentReceipt> {
        let receipt = PaymentReceipt::from_submission(submission)?;
        self.store.insert(receipt.clone()).await?;

        info!(
            receipt = %receipt.id,
            plan = %receipt.plan_type,
            amount = receipt.amount.value(),
            "payment receipt submitted"
        );
        self.bus
            .publish(EventPayload::PaymentSubmitted(receipt.clone()));
        Ok(receipt)
    }

    /// Applies an admin decision to a pending receipt.
    ///
    /// At most one decision is ever accepted per receipt: the check-and-set
    /// runs atomically inside the store, so of two near-simultaneous calls
    /// one succeeds and the other gets `AlreadyDecided`.
    pub async fn decide(
        &self,
        id: ReceiptId,
        decision: Decision,
        admin_notes: Option<String>,
    ) -> Result<PaymentReceipt> {
        self.processing.fetch_add(1, Ordering::SeqCst);
        let result = self.store.decide(id, decision, admin_notes, Utc::now()).await;
        self.processing.fetch_sub(1, Ordering::SeqCst);
        let receipt = result?;

        info!(
            receipt = %receipt.id,
            outcome = %receipt.status,
            "payment receipt decided"
        );
        let payload = match decision {
            Decision::Approved => EventPayload::PaymentApproved(receipt.clone()),
            Decision::Rejected => EventPayload::PaymentRejected(receipt.clone()),
        };
        self.bus.publish(payload);
        Ok(receipt)
    }

    /// Receipts still awaiting review, in submission order.
    pub async fn pending(&self) -> Result<Vec<PaymentReceipt>> {
        self.store.pending().await
    }

    /// Every receipt ever submitted, terminal ones included.
    pub async fn receipts(&self) -> Result<Vec<PaymentReceipt>> {
        self.store.all().await
    }

    /// Looks up one receipt regardless of status.
    pub async fn receipt(&self, id: ReceiptId) -> Result<Option<PaymentReceipt>> {
        self.store.get(id).await
    }

    pub async fn status(&self) -> Result<QueueStatus> {
        Ok(QueueStatus {
            queue_length: self.store.pending_count().await?,
            current_processing: self.processing.load(Ordering::SeqCst),
        })
    }
}
