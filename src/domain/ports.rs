use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::employee::{EmployeeId, EmployeeRecord};
use super::receipt::{Decision, PaymentReceipt, ReceiptId};
use crate::error::Result;

/// Storage port for payment receipts.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    async fn insert(&self, receipt: PaymentReceipt) -> Result<()>;
    async fn get(&self, id: ReceiptId) -> Result<Option<PaymentReceipt>>;
    /// All receipts, terminal included, in submission order.
    async fn all(&self) -> Result<Vec<PaymentReceipt>>;
    /// Pending receipts in submission order.
    async fn pending(&self) -> Result<Vec<PaymentReceipt>>;
    async fn pending_count(&self) -> Result<usize>;
    /// Applies the terminal transition and returns the updated receipt.
    ///
    /// Implementations must perform the status check and the update in a
    /// single critical section: of several concurrent calls for the same
    /// receipt, exactly one may succeed and the rest must fail with
    /// `AlreadyDecided`.
    async fn decide(
        &self,
        id: ReceiptId,
        decision: Decision,
        admin_notes: Option<String>,
        decided_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt>;
}

pub type ReceiptStoreBox = Box<dyn ReceiptStore>;

/// Storage port for employee records (the persistence collaborator).
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord>;
    /// Full-record upsert by id; fails if the id is unknown.
    async fn update(&self, record: EmployeeRecord) -> Result<EmployeeRecord>;
    async fn delete(&self, id: EmployeeId) -> Result<()>;
    async fn get(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>>;
}

pub type EmployeeStoreBox = Box<dyn EmployeeStore>;
