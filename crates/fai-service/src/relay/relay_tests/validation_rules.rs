use super::*;

#[test]
fn enqueue_accepts_a_body_at_the_ceiling() {
    let body = vec![b'x'; 500_000];
    assert!(validate_enqueue_body(&body, 500_000).is_ok());
}

#[test]
fn enqueue_rejects_one_byte_past_the_ceiling() {
    let body = vec![b'x'; 500_001];
    let err = validate_enqueue_body(&body, 500_000).unwrap_err();
    assert_eq!(err.status_code, 413);
    assert_eq!(err.message, "Payload muito grande");
}

#[test]
fn enqueue_rejects_an_empty_body() {
    let err = validate_enqueue_body(&[], 500_000).unwrap_err();
    assert_eq!(err.status_code, 400);
    assert_eq!(err.message, "Payload ausente");
}

#[test]
fn direct_ceiling_is_tighter_and_maps_to_bad_request() {
    let at_limit = vec![b'x'; 200_000];
    assert!(validate_direct_body(&at_limit, 200_000).is_ok());

    let over_limit = vec![b'x'; 200_001];
    let err = validate_direct_body(&over_limit, 200_000).unwrap_err();
    assert_eq!(err.status_code, 400);
    assert_eq!(err.message, "Payload inválido ou muito grande");

    let err = validate_direct_body(&[], 200_000).unwrap_err();
    assert_eq!(err.status_code, 400);
    assert_eq!(err.message, "Payload inválido ou muito grande");
}

#[test]
fn only_post_passes_the_method_gate() {
    assert!(require_post_method("POST").is_ok());
    for method in ["GET", "PUT", "DELETE", "PATCH", "OPTIONS", "HEAD"] {
        let err = require_post_method(method).unwrap_err();
        assert_eq!(err.status_code, 405, "method {method}");
        assert_eq!(err.message, "Método não permitido");
    }
}
