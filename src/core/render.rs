use crate::domain::model::RaceOutcome;

pub const TIMEOUT_MESSAGE: &str = "Request timeout";
pub const EXHAUSTED_MESSAGE: &str = "No response from any service";

/// Text printed to stdout for an outcome. `Failed` prints nothing.
pub fn render_outcome(outcome: &RaceOutcome) -> Option<String> {
    match outcome {
        RaceOutcome::Resolved { service, address } => {
            Some(format!("Response from {}:\n{}", service, address))
        }
        RaceOutcome::Failed { .. } => None,
        RaceOutcome::Exhausted { .. } => Some(EXHAUSTED_MESSAGE.to_string()),
        RaceOutcome::TimedOut => Some(TIMEOUT_MESSAGE.to_string()),
    }
}
