use std::io::Error;
use std::path::Path;

/// Writes a replay action file. Each row is
/// `[action, user, plan, amount, receipt_ref, notes]`.
pub fn write_actions(path: &Path, rows: &[[&str; 6]]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;

    wtr.write_record(["action", "user", "plan", "amount", "receipt_ref", "notes"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
