//! Application layer containing the core coordination logic.
//!
//! This module defines the `EventBus` fan-out, the `PaymentQueue` approval
//! workflow and the `EmployeeLifecycleNotifier` adapter. Components receive
//! the bus instance explicitly; there is no ambient singleton.

pub mod bus;
pub mod notifier;
pub mod queue;
