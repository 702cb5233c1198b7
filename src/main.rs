use clap::Parser;
use miette::{IntoDiagnostic, Result};
use qrpulse::application::bus::EventBus;
use qrpulse::application::queue::PaymentQueue;
use qrpulse::domain::event::{EventPayload, SystemNotice};
use qrpulse::domain::receipt::{Decision, ReceiptId, SubmitPayment};
use qrpulse::error::RealtimeError;
use qrpulse::infrastructure::in_memory::InMemoryReceiptStore;
use qrpulse::interfaces::csv::action_reader::{ActionReader, ActionRecord, ActionType};
use qrpulse::interfaces::csv::receipt_writer::ReceiptWriter;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input actions CSV file
    input: PathBuf,

    /// Print each delivered event to stderr as it happens
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let bus = Arc::new(EventBus::new());
    let delivered = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&delivered);
    let verbose = cli.verbose;
    let _subscription = bus.subscribe(move |event| {
        counter.fetch_add(1, Ordering::Relaxed);
        if verbose {
            eprintln!("[{}] {}", event.timestamp.to_rfc3339(), event.kind());
        }
    });

    let queue = PaymentQueue::new(Box::new(InMemoryReceiptStore::new()), Arc::clone(&bus));

    // Replay actions
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ActionReader::new(file);
    // Latest submission per user, so approve/reject rows can target it
    let mut latest: HashMap<String, ReceiptId> = HashMap::new();
    for action_result in reader.actions() {
        match action_result {
            Ok(action) => {
                if let Err(e) = apply_action(&queue, &bus, &mut latest, action).await {
                    eprintln!("Error applying action: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
    }

    let status = queue.status().await.into_diagnostic()?;
    eprintln!(
        "{} events delivered, {} receipts still pending",
        delivered.load(Ordering::Relaxed),
        status.queue_length
    );

    // Output final receipt table
    let receipts = queue.receipts().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReceiptWriter::new(stdout.lock());
    writer.write_receipts(receipts).into_diagnostic()?;

    Ok(())
}

async fn apply_action(
    queue: &PaymentQueue,
    bus: &EventBus,
    latest: &mut HashMap<String, ReceiptId>,
    action: ActionRecord,
) -> qrpulse::error::Result<()> {
    match action.action {
        ActionType::Submit => {
            let receipt = queue
                .submit(SubmitPayment {
                    user_id: action.user.clone(),
                    plan_type: action.plan.unwrap_or_default(),
                    amount: action.amount.unwrap_or_default(),
                    receipt_reference: action.receipt_ref.unwrap_or_default(),
                    user_name: None,
                    user_email: None,
                })
                .await?;
            latest.insert(action.user, receipt.id);
        }
        ActionType::Approve | ActionType::Reject => {
            let id = latest.get(&action.user).copied().ok_or_else(|| {
                RealtimeError::Validation(format!("no submission on record for {}", action.user))
            })?;
            let decision = match action.action {
                ActionType::Approve => Decision::Approved,
                _ => Decision::Rejected,
            };
            queue.decide(id, decision, action.notes).await?;
        }
        ActionType::Notice => {
            bus.publish(EventPayload::SystemNotification(SystemNotice::info(
                action.notes.unwrap_or_default(),
            )));
        }
    }
    Ok(())
}
