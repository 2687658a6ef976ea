use super::*;

#[test]
fn downstream_created_passes_through_with_ok_true() {
    let outcome = AttemptOutcome::Replied(WebhookReply {
        status: 201,
        data: json!({ "id": 7 }),
    });
    let (status, body) = direct_response_for_outcome(outcome);
    assert_eq!(status, 201);
    assert_eq!(body, json!({ "ok": true, "status": 201, "data": { "id": 7 } }));
}

#[test]
fn downstream_rejection_passes_through_with_ok_false() {
    let outcome = AttemptOutcome::Replied(WebhookReply {
        status: 422,
        data: json!({ "error": "campo obrigatório" }),
    });
    let (status, body) = direct_response_for_outcome(outcome);
    assert_eq!(status, 422);
    assert_eq!(body["ok"], false);
    assert_eq!(body["status"], 422);
    assert_eq!(body["data"], json!({ "error": "campo obrigatório" }));
}

#[test]
fn elapsed_deadline_maps_to_timeout_message() {
    let outcome = AttemptOutcome::TransportError {
        timed_out: true,
        name: "timeout".to_string(),
        message: "operation timed out".to_string(),
    };
    let (status, body) = direct_response_for_outcome(outcome);
    assert_eq!(status, 504);
    assert_eq!(body, json!({ "error": "Timeout ao contatar o serviço" }));
}

#[test]
fn other_transport_failures_carry_the_cause() {
    let outcome = AttemptOutcome::TransportError {
        timed_out: false,
        name: "connect".to_string(),
        message: "connection refused".to_string(),
    };
    let (status, body) = direct_response_for_outcome(outcome);
    assert_eq!(status, 504);
    assert_eq!(body["error"], "Falha ao processar: connection refused");
}

#[test]
fn reply_text_parses_json_and_falls_back_to_raw() {
    assert_eq!(parse_reply_text(r#"{"id":7}"#), json!({ "id": 7 }));
    assert_eq!(
        parse_reply_text("upstream said no"),
        Value::String("upstream said no".to_string())
    );
}

#[test]
fn empty_reply_body_becomes_null_not_empty_string() {
    assert_eq!(parse_reply_text(""), Value::Null);
    assert_eq!(parse_reply_text("   "), Value::String("   ".to_string()));
}

#[test]
fn success_range_is_the_two_hundreds() {
    assert!(is_success_status(200));
    assert!(is_success_status(202));
    assert!(is_success_status(299));
    assert!(!is_success_status(199));
    assert!(!is_success_status(302));
    assert!(!is_success_status(500));
}
