use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::employee::{EmployeeId, EmployeeRecord};
use crate::domain::ports::{EmployeeStore, ReceiptStore};
use crate::domain::receipt::{Decision, PaymentReceipt, ReceiptId, ReceiptStatus};
use crate::error::{RealtimeError, Result};

#[derive(Default)]
struct ReceiptTable {
    by_id: HashMap<ReceiptId, PaymentReceipt>,
    // Submission order; ids are never removed, terminal receipts are
    // filtered out of the pending view instead.
    order: Vec<ReceiptId>,
}

/// A thread-safe in-memory store for payment receipts.
///
/// Uses `Arc<RwLock<..>>` to allow shared concurrent access. The write lock
/// makes `decide` a single check-and-set critical section, which is what
/// guarantees at most one accepted decision per receipt.
#[derive(Default, Clone)]
pub struct InMemoryReceiptStore {
    table: Arc<RwLock<ReceiptTable>>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn insert(&self, receipt: PaymentReceipt) -> Result<()> {
        let mut table = self.table.write().await;
        table.order.push(receipt.id);
        table.by_id.insert(receipt.id, receipt);
        Ok(())
    }

    async fn get(&self, id: ReceiptId) -> Result<Option<PaymentReceipt>> {
        let table = self.table.read().await;
        Ok(table.by_id.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<PaymentReceipt>> {
        let table = self.table.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.by_id.get(id))
            .cloned()
            .collect())
    }

    async fn pending(&self) -> Result<Vec<PaymentReceipt>> {
        let table = self.table.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.by_id.get(id))
            .filter(|receipt| receipt.status == ReceiptStatus::Pending)
            .cloned()
            .collect())
    }

    async fn pending_count(&self) -> Result<usize> {
        let table = self.table.read().await;
        Ok(table
            .by_id
            .values()
            .filter(|receipt| receipt.status == ReceiptStatus::Pending)
            .count())
    }

    async fn decide(
        &self,
        id: ReceiptId,
        decision: Decision,
        admin_notes: Option<String>,
        decided_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt> {
        let mut table = self.table.write().await;
        let receipt = table
            .by_id
            .get_mut(&id)
            .ok_or(RealtimeError::ReceiptNotFound(id))?;
        receipt.decide(decision, admin_notes, decided_at)?;
        Ok(receipt.clone())
    }
}

/// A thread-safe in-memory store for employee records.
///
/// Stands in for the hosted persistence collaborator in tests and the replay
/// binary.
#[derive(Default, Clone)]
pub struct InMemoryEmployeeStore {
    records: Arc<RwLock<HashMap<EmployeeId, EmployeeRecord>>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord> {
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: EmployeeRecord) -> Result<EmployeeRecord> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.id) {
            return Err(RealtimeError::EmployeeNotFound(record.id));
        }
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: EmployeeId) -> Result<()> {
        let mut records = self.records.write().await;
        records
            .remove(&id)
            .map(|_| ())
            .ok_or(RealtimeError::EmployeeNotFound(id))
    }

    async fn get(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::NewEmployee;
    use crate::domain::receipt::SubmitPayment;

    fn receipt(user: &str) -> PaymentReceipt {
        PaymentReceipt::from_submission(SubmitPayment {
            user_id: user.to_string(),
            plan_type: "basic".to_string(),
            amount: 500,
            receipt_reference: "uploads/r.png".to_string(),
            user_name: None,
            user_email: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryReceiptStore::new();
        let receipt = receipt("user-1");

        store.insert(receipt.clone()).await.unwrap();
        let retrieved = store.get(receipt.id).await.unwrap().unwrap();
        assert_eq!(retrieved, receipt);

        assert!(store.get(ReceiptId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_decide_is_first_committer_wins() {
        let store = InMemoryReceiptStore::new();
        let receipt = receipt("user-1");
        store.insert(receipt.clone()).await.unwrap();

        let approved = store
            .decide(receipt.id, Decision::Approved, None, Utc::now())
            .await
            .unwrap();
        assert_eq!(approved.status, ReceiptStatus::Approved);

        let second = store
            .decide(receipt.id, Decision::Rejected, None, Utc::now())
            .await;
        assert!(matches!(
            second,
            Err(RealtimeError::AlreadyDecided { .. })
        ));
    }

    #[tokio::test]
    async fn test_pending_view_ordering_and_counts() {
        let store = InMemoryReceiptStore::new();
        let first = receipt("a");
        let second = receipt("b");
        store.insert(first.clone()).await.unwrap();
        store.insert(second.clone()).await.unwrap();

        assert_eq!(store.pending_count().await.unwrap(), 2);

        store
            .decide(first.id, Decision::Approved, None, Utc::now())
            .await
            .unwrap();

        let pending = store.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);
        assert_eq!(store.pending_count().await.unwrap(), 1);
        assert_eq!(store.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_employee_store_roundtrip() {
        let store = InMemoryEmployeeStore::new();
        let record = EmployeeRecord::create(NewEmployee {
            full_name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: String::new(),
            department: "Ops".to_string(),
            badge_code: "OPS-1".to_string(),
        })
        .unwrap();

        store.insert(record.clone()).await.unwrap();
        assert_eq!(store.get(record.id).await.unwrap().unwrap(), record);

        store.delete(record.id).await.unwrap();
        assert!(store.get(record.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(record.id).await,
            Err(RealtimeError::EmployeeNotFound(_))
        ));
    }
}
