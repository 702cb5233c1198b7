use std::io::Write;

use crate::domain::receipt::PaymentReceipt;
use crate::error::Result;

/// Writes the final receipt table as CSV.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_receipts(&mut self, receipts: Vec<PaymentReceipt>) -> Result<()> {
        self.writer
            .write_record(["id", "user", "plan", "amount", "status", "notes"])?;

        for receipt in receipts {
            self.writer.write_record([
                receipt.id.to_string(),
                receipt.user_id,
                receipt.plan_type,
                receipt.amount.value().to_string(),
                receipt.status.to_string(),
                receipt.admin_notes.unwrap_or_default(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
