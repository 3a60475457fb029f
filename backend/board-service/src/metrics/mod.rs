//! Prometheus metrics for board-service.
//!
//! Collectors live in the default registry so `/metrics` also exposes the
//! pool gauges published by `db-pool`.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// register, login_success, login_failure, token_rejected
    static ref AUTH_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_auth_events_total",
        "Authentication events by outcome",
        &["event"]
    )
    .expect("board_auth_events_total registration should succeed at startup");

    static ref LIKE_TOGGLES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_like_toggles_total",
        "Like toggles by resulting action",
        &["action"]
    )
    .expect("board_like_toggles_total registration should succeed at startup");

    static ref POST_MUTATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_post_mutations_total",
        "Post create/update/delete attempts by outcome",
        &["action", "outcome"]
    )
    .expect("board_post_mutations_total registration should succeed at startup");
}

pub fn record_auth_event(event: &str) {
    AUTH_EVENTS_TOTAL.with_label_values(&[event]).inc();
}

pub fn record_like_toggle(liked: bool) {
    let action = if liked { "liked" } else { "unliked" };
    LIKE_TOGGLES_TOTAL.with_label_values(&[action]).inc();
}

pub fn record_post_mutation(action: &str, outcome: &str) {
    POST_MUTATIONS_TOTAL
        .with_label_values(&[action, outcome])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
