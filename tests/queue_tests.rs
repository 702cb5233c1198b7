use qrpulse::application::bus::EventBus;
use qrpulse::application::queue::PaymentQueue;
use qrpulse::domain::event::{EventKind, EventPayload};
use qrpulse::domain::receipt::{Decision, ReceiptStatus, SubmitPayment};
use qrpulse::error::RealtimeError;
use qrpulse::infrastructure::in_memory::InMemoryReceiptStore;
use qrpulse::interfaces::api::{DecidePaymentResponse, SubmitPaymentResponse};
use std::sync::{Arc, Mutex};

fn queue_with_bus() -> (PaymentQueue, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new());
    let queue = PaymentQueue::new(Box::new(InMemoryReceiptStore::new()), Arc::clone(&bus));
    (queue, bus)
}

fn submission(user: &str, plan: &str, amount: i64) -> SubmitPayment {
    SubmitPayment {
        user_id: user.to_string(),
        plan_type: plan.to_string(),
        amount,
        receipt_reference: format!("uploads/{user}.png"),
        user_name: Some(user.to_string()),
        user_email: Some(format!("{user}@example.com")),
    }
}

#[tokio::test]
async fn test_premium_upgrade_review_flow() {
    let (queue, bus) = queue_with_bus();

    // Two independent dashboard subscribers
    let first_seen = Arc::new(Mutex::new(Vec::new()));
    let second_seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&first_seen);
    let _first = bus.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    let sink = Arc::clone(&second_seen);
    let _second = bus.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    // Submission
    let result = queue.submit(submission("user-1", "premium", 999)).await;
    let receipt = result.as_ref().unwrap().clone();
    let envelope = SubmitPaymentResponse::from(result);
    assert!(envelope.success);
    assert_eq!(envelope.receipt_id, Some(receipt.id));

    for seen in [&first_seen, &second_seen] {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind(), EventKind::PaymentSubmitted);
        match &seen[0].payload {
            EventPayload::PaymentSubmitted(snapshot) => {
                assert_eq!(snapshot.amount.value(), 999)
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    // Approval
    let approved = queue
        .decide(
            receipt.id,
            Decision::Approved,
            Some("looks good".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(approved.status, ReceiptStatus::Approved);

    {
        let seen = first_seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        match &seen[1].payload {
            EventPayload::PaymentApproved(snapshot) => {
                assert_eq!(snapshot.status, ReceiptStatus::Approved);
                assert_eq!(snapshot.admin_notes.as_deref(), Some("looks good"));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    // Second decision is refused and publishes nothing
    let second = queue.decide(receipt.id, Decision::Rejected, None).await;
    let envelope = DecidePaymentResponse::from(second);
    assert!(!envelope.success);
    assert_eq!(
        envelope.error.as_deref(),
        Some("This payment has already been reviewed.")
    );
    assert_eq!(first_seen.lock().unwrap().len(), 2);
    assert_eq!(second_seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_queue_length_matches_pending_view() {
    let (queue, _bus) = queue_with_bus();

    let mut ids = Vec::new();
    for (user, amount) in [("a", 100), ("b", 200), ("c", 300), ("d", 400)] {
        ids.push(queue.submit(submission(user, "basic", amount)).await.unwrap().id);
    }

    for (index, id) in ids.iter().enumerate() {
        let status = queue.status().await.unwrap();
        assert_eq!(status.queue_length, queue.pending().await.unwrap().len());

        let decision = if index % 2 == 0 {
            Decision::Approved
        } else {
            Decision::Rejected
        };
        queue.decide(*id, decision, None).await.unwrap();
    }

    let status = queue.status().await.unwrap();
    assert_eq!(status.queue_length, 0);
    assert_eq!(queue.pending().await.unwrap().len(), 0);
    assert_eq!(status.current_processing, 0);
}

#[tokio::test]
async fn test_rejected_submission_reports_validation_error() {
    let (queue, bus) = queue_with_bus();
    let seen = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&seen);
    let _subscription = bus.subscribe(move |_| *sink.lock().unwrap() += 1);

    let result = queue.submit(submission("user-1", "premium", 0)).await;
    assert!(matches!(result, Err(RealtimeError::Validation(_))));

    let envelope = SubmitPaymentResponse::from(
        queue.submit(submission("", "premium", 100)).await,
    );
    assert!(!envelope.success);
    assert!(envelope.error.is_some());

    assert_eq!(*seen.lock().unwrap(), 0);
    assert!(queue.receipts().await.unwrap().is_empty());
}
