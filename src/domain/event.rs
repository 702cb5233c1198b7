use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::employee::{EmployeeId, EmployeeRecord};
use super::receipt::PaymentReceipt;

/// Closed enumeration of everything the bus can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PaymentSubmitted,
    PaymentApproved,
    PaymentRejected,
    EmployeeCreated,
    EmployeeUpdated,
    EmployeeDeleted,
    SystemNotification,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentSubmitted => "payment_submitted",
            Self::PaymentApproved => "payment_approved",
            Self::PaymentRejected => "payment_rejected",
            Self::EmployeeCreated => "employee_created",
            Self::EmployeeUpdated => "employee_updated",
            Self::EmployeeDeleted => "employee_deleted",
            Self::SystemNotification => "system_notification",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A generic operator/system notice carried as an event payload.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SystemNotice {
    pub message: String,
    pub level: NoticeLevel,
}

impl SystemNotice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
        }
    }
}

/// Kind-specific event payload, one case per [`EventKind`].
///
/// Serializes as `{ "kind": ..., "payload": ... }`, which is the shape
/// dashboard consumers receive.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EventPayload {
    PaymentSubmitted(PaymentReceipt),
    PaymentApproved(PaymentReceipt),
    PaymentRejected(PaymentReceipt),
    EmployeeCreated(EmployeeRecord),
    EmployeeUpdated(EmployeeRecord),
    EmployeeDeleted { id: EmployeeId },
    SystemNotification(SystemNotice),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PaymentSubmitted(_) => EventKind::PaymentSubmitted,
            Self::PaymentApproved(_) => EventKind::PaymentApproved,
            Self::PaymentRejected(_) => EventKind::PaymentRejected,
            Self::EmployeeCreated(_) => EventKind::EmployeeCreated,
            Self::EmployeeUpdated(_) => EventKind::EmployeeUpdated,
            Self::EmployeeDeleted { .. } => EventKind::EmployeeDeleted,
            Self::SystemNotification(_) => EventKind::SystemNotification,
        }
    }
}

/// An immutable record of one state change, stamped at emission.
///
/// Events are fire-and-forget: never mutated after creation and never
/// replayed to subscribers that register later.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Event {
    #[serde(flatten)]
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub(crate) fn now(payload: EventPayload) -> Self {
        Self {
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = Event::now(EventPayload::SystemNotification(SystemNotice::info(
            "maintenance at midnight",
        )));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"], "system_notification");
        assert_eq!(value["payload"]["message"], "maintenance at midnight");
        assert_eq!(value["payload"]["level"], "info");
        // chrono serializes DateTime<Utc> as an RFC 3339 string
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_kind_matches_payload() {
        let event = Event::now(EventPayload::SystemNotification(SystemNotice::info("x")));
        assert_eq!(event.kind(), EventKind::SystemNotification);
        assert_eq!(event.kind().as_str(), "system_notification");
    }
}
