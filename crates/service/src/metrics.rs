use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

// Prometheus metrics (default registry)
pub static CONTENT_MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "cms_content_mutations_total",
        "Successful content writes by kind and operation",
        &["kind", "op"]
    )
    .expect("register content_mutations_total")
});

pub static VALIDATION_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "cms_validation_failures_total",
        "Writes rejected by field validation or slug conflicts",
        &["kind"]
    )
    .expect("register validation_failures_total")
});

pub static LEADS_SUBMITTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "cms_leads_submitted_total",
        "Contact form submissions accepted"
    )
    .expect("register leads_submitted_total")
});

pub fn record_mutation(kind: &str, op: &str) {
    CONTENT_MUTATIONS_TOTAL.with_label_values(&[kind, op]).inc();
}

pub fn record_rejection(kind: &str) {
    VALIDATION_FAILURES_TOTAL.with_label_values(&[kind]).inc();
}

/// Register every collector so `/metrics` lists them before first use.
pub fn init() {
    Lazy::force(&CONTENT_MUTATIONS_TOTAL);
    Lazy::force(&VALIDATION_FAILURES_TOTAL);
    Lazy::force(&LEADS_SUBMITTED_TOTAL);
}
