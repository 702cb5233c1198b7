use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::bus::EventBus;
use crate::domain::employee::{EmployeeId, EmployeeRecord, NewEmployee};
use crate::domain::event::EventPayload;
use crate::domain::ports::EmployeeStoreBox;
use crate::error::Result;

/// Translates successful employee persistence results into lifecycle events.
///
/// A pure side-effect adapter: no state of its own. A failed persistence call
/// propagates its error and emits nothing, so consumers never see a lifecycle
/// event for a change that did not happen.
pub struct EmployeeLifecycleNotifier {
    store: EmployeeStoreBox,
    bus: Arc<EventBus>,
}

impl EmployeeLifecycleNotifier {
    pub fn new(store: EmployeeStoreBox, bus: Arc<EventBus>) -> Self {
        Self { store, bus }
    }

    pub async fn create(&self, new: NewEmployee) -> Result<EmployeeRecord> {
        let record = EmployeeRecord::create(new)?;
        let stored = self.store.insert(record).await?;

        info!(employee = %stored.id, "employee created");
        self.bus
            .publish(EventPayload::EmployeeCreated(stored.clone()));
        Ok(stored)
    }

    pub async fn update(&self, mut record: EmployeeRecord) -> Result<EmployeeRecord> {
        record.updated_at = Utc::now();
        let stored = self.store.update(record).await?;

        info!(employee = %stored.id, "employee updated");
        self.bus
            .publish(EventPayload::EmployeeUpdated(stored.clone()));
        Ok(stored)
    }

    pub async fn delete(&self, id: EmployeeId) -> Result<()> {
        self.store.delete(id).await?;

        info!(employee = %id, "employee deleted");
        self.bus.publish(EventPayload::EmployeeDeleted { id });
        Ok(())
    }
}
