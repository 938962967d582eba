use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

use crate::error::ValidationError;

lazy_static! {
    /// Entities created through the API, by kind (post, comment, follow, group).
    pub static ref ENTITIES_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_entities_created_total",
        "Entities created segmented by kind",
        &["entity"]
    )
    .expect("failed to register blog_entities_created_total");

    /// Rejected follow requests (self, duplicate).
    pub static ref FOLLOW_REJECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_follow_rejections_total",
        "Follow requests rejected segmented by reason",
        &["reason"]
    )
    .expect("failed to register blog_follow_rejections_total");

    /// HTTP request latency by method and response status.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "blog_http_request_duration_seconds",
        "HTTP request duration segmented by method and status",
        &["method", "status"]
    )
    .expect("failed to register blog_http_request_duration_seconds");
}

pub fn record_created(entity: &str) {
    ENTITIES_CREATED_TOTAL.with_label_values(&[entity]).inc();
}

/// Count a rejected follow. Other validation errors are not follow rejections.
pub fn record_follow_rejection(err: &ValidationError) {
    let reason = match err {
        ValidationError::SelfFollow => "self",
        ValidationError::DuplicateFollow => "duplicate",
        ValidationError::Fields(_) => return,
    };
    FOLLOW_REJECTIONS_TOTAL.with_label_values(&[reason]).inc();
}

pub fn observe_request(method: &str, status: u16, seconds: f64) {
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, &status.to_string()])
        .observe(seconds);
}
