use super::*;
use std::sync::Mutex;
use std::thread;

// Serializes the tests that reach the global queue-depth gauge.
static DEPTH_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn dispatch_refuses_when_the_queue_is_full() {
    let _lock = DEPTH_LOCK.lock().expect("depth lock");
    let (tx, _rx) = mpsc::sync_channel(1);
    let dispatcher = dispatcher_with_sender(tx);
    assert!(dispatcher.dispatch(br#"{"a":1}"#.to_vec()).is_ok());
    let err = dispatcher.dispatch(br#"{"a":2}"#.to_vec()).unwrap_err();
    assert!(matches!(err, DispatchError::QueueFull));
}

#[test]
fn dispatch_reports_a_closed_worker_pool() {
    let _lock = DEPTH_LOCK.lock().expect("depth lock");
    let (tx, rx) = mpsc::sync_channel(1);
    drop(rx);
    let dispatcher = dispatcher_with_sender(tx);
    let err = dispatcher.dispatch(br#"{"a":1}"#.to_vec()).unwrap_err();
    assert!(matches!(err, DispatchError::Closed));
}

#[test]
fn queued_jobs_get_distinct_ids() {
    let _lock = DEPTH_LOCK.lock().expect("depth lock");
    let (tx, _rx) = mpsc::sync_channel(4);
    let dispatcher = dispatcher_with_sender(tx);
    let first = dispatcher.dispatch(br#"{"a":1}"#.to_vec()).expect("first");
    let second = dispatcher.dispatch(br#"{"a":2}"#.to_vec()).expect("second");
    assert_ne!(first, second);
}

#[test]
fn refused_dispatch_returns_its_depth_slot() {
    let _lock = DEPTH_LOCK.lock().expect("depth lock");
    let (tx, rx) = mpsc::sync_channel(1);
    let dispatcher = dispatcher_with_sender(tx);
    let before = relay_metrics_snapshot().relay_queue_depth;
    dispatcher.dispatch(br#"{"a":1}"#.to_vec()).expect("first");
    assert_eq!(relay_metrics_snapshot().relay_queue_depth, before + 1);
    let err = dispatcher.dispatch(br#"{"a":2}"#.to_vec()).unwrap_err();
    assert!(matches!(err, DispatchError::QueueFull));
    assert_eq!(relay_metrics_snapshot().relay_queue_depth, before + 1);
    let _job = rx.recv().expect("queued job");
    record_relay_job_started();
    assert_eq!(relay_metrics_snapshot().relay_queue_depth, before);
}

#[test]
fn queue_depth_gauge_survives_an_eager_worker() {
    let _lock = DEPTH_LOCK.lock().expect("depth lock");
    let before = relay_metrics_snapshot().relay_queue_depth;
    let (tx, rx) = mpsc::sync_channel::<RelayJob>(1);
    let dispatcher = dispatcher_with_sender(tx);
    let consumer = thread::spawn(move || {
        while let Ok(_job) = rx.recv() {
            record_relay_job_started();
        }
    });
    let mut queued = 0;
    while queued < 64 {
        match dispatcher.dispatch(br#"{"a":1}"#.to_vec()) {
            Ok(_) => queued += 1,
            Err(DispatchError::QueueFull) => thread::yield_now(),
            Err(DispatchError::Closed) => panic!("worker hung up"),
        }
        let depth = relay_metrics_snapshot().relay_queue_depth;
        assert!(depth < usize::MAX / 2, "depth gauge wrapped: {depth}");
    }
    drop(dispatcher);
    consumer.join().expect("consumer");
    assert_eq!(relay_metrics_snapshot().relay_queue_depth, before);
}

#[test]
fn prometheus_text_lists_every_relay_series() {
    let text = relay_metrics_prometheus();
    assert!(text.contains("fai_enqueue_requests_total "));
    assert!(text.contains("fai_enqueue_accepted_total "));
    assert!(text.contains("fai_enqueue_rejected_total "));
    assert!(text.contains("fai_relay_jobs_total "));
    assert!(text.contains("fai_relay_queue_depth "));
    assert!(text.contains("fai_relay_attempts_total "));
    assert!(text.contains("fai_relay_delivered_total "));
    assert!(text.contains("fai_relay_exhausted_total "));
    assert!(text.contains("fai_relay_job_duration_milliseconds_total "));
    assert!(text.contains("fai_relay_job_duration_milliseconds_count "));
    assert!(text.contains("fai_direct_requests_total "));
    assert!(text.contains("fai_direct_requests_active "));
    assert!(text.contains("fai_direct_gateway_failures_total "));
}

#[test]
fn submission_summary_fingerprints_the_student() {
    let body = serde_json::to_vec(&json!({
        "meta": {
            "turma": "Alfa",
            "om": "1BI",
            "aluno": "Fulano de Tal",
            "instrutor": "Sgt Exemplo",
            "ano": "2025",
            "local": "Campo",
            "data": "2025-03-01"
        },
        "responses": { "I_1": "1" },
        "summary": {
            "total": 1.0,
            "maxTotal": 10.0,
            "percentage": 10.0,
            "grau": "D",
            "details": {},
            "allAnswered": false
        }
    }))
    .expect("serialize");
    let summary = summarize_submission(&body).expect("summary");
    assert!(summary.contains("grau=D"));
    assert!(summary.contains("aluno_fp="));
    assert!(!summary.contains("Fulano"));
}

#[test]
fn non_submission_bodies_produce_no_summary() {
    assert!(summarize_submission(br#"{"anything":"else"}"#).is_none());
    assert!(summarize_submission(b"not json").is_none());
}
