//! Counters recorded by the gateway. Nothing is exported unless the host
//! installs a `metrics` recorder.

use crate::TrainmateError;

pub const GATEWAY_REQUESTS: &str = "trainmate_gateway_requests_total";
pub const GATEWAY_FAILURES: &str = "trainmate_gateway_failures_total";
pub const GATEWAY_SKIPPED_RECORDS: &str = "trainmate_gateway_skipped_records_total";

pub fn record_request(operation: &'static str) {
    metrics::counter!(GATEWAY_REQUESTS, "operation" => operation).increment(1);
}

pub fn record_failure(operation: &'static str, err: &TrainmateError) {
    metrics::counter!(GATEWAY_FAILURES, "operation" => operation, "kind" => err.kind())
        .increment(1);
}

/// A list entry that could not be decoded and was left out of the result.
pub fn record_skipped(operation: &'static str) {
    metrics::counter!(GATEWAY_SKIPPED_RECORDS, "operation" => operation).increment(1);
}
