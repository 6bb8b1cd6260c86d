use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("gemchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemchat.client.request_duration_seconds");

pub(crate) static SESSION_TURNS: Counter = Counter::new("gemchat.session.turns");
pub(crate) static SESSION_FAILED_TURNS: Counter = Counter::new("gemchat.session.failed_turns");
pub(crate) static SESSION_RETRIES: Counter = Counter::new("gemchat.session.retries");

pub(crate) static PLANNER_PLANS: Counter = Counter::new("gemchat.planner.plans");
pub(crate) static PLANNER_REGENERATIONS: Counter = Counter::new("gemchat.planner.regenerations");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_FAILED_TURNS);
    collector.register_counter(&SESSION_RETRIES);

    collector.register_counter(&PLANNER_PLANS);
    collector.register_counter(&PLANNER_REGENERATIONS);
}
