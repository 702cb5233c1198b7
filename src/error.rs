use thiserror::Error;

use crate::domain::employee::EmployeeId;
use crate::domain::receipt::{ReceiptId, ReceiptStatus};

pub type Result<T> = std::result::Result<T, RealtimeError>;

#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Receipt {0} not found")]
    ReceiptNotFound(ReceiptId),
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("Receipt {id} has already been decided ({status})")]
    AlreadyDecided { id: ReceiptId, status: ReceiptStatus },
    #[error("Internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}
