//! Event count extraction from `### Finalize` summary lines.

use tracing::{debug, warn};

/// Marker that opens a finalize summary line.
pub const FINALIZE_MARKER: &str = "### Finalize";

const EVENTS_KEY: &str = "events";

/// Read the event count from a finalize line such as
/// `### Finalize: groups 10, events 12000 (binned 11000) [trials 13000]`.
///
/// The search for `events` starts after the marker; the count is the token
/// following it, up to the next space. Returns `None` if either is missing
/// or the token is not a number.
pub fn extract_event_count(line: &str) -> Option<f64> {
    let tail = line.get(FINALIZE_MARKER.len()..)?;
    let at = tail.find(EVENTS_KEY)?;
    let rest = tail[at + EVENTS_KEY.len()..].trim_start();
    let token = rest.split(' ').next()?;
    token.trim_end_matches(',').parse().ok()
}

/// Total event count used as the normalization denominator.
///
/// Starts at 1.0 and accepts at most one value from the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventCount {
    value: f64,
    from_input: bool,
}

impl Default for EventCount {
    fn default() -> Self {
        Self { value: 1.0, from_input: false }
    }
}

impl EventCount {
    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether the value came from a finalize line.
    pub fn from_input(&self) -> bool {
        self.from_input
    }

    /// Consume a finalize line. Returns `true` if it set the count.
    pub fn observe(&mut self, line_number: usize, line: &str) -> bool {
        if self.from_input {
            debug!("line {line_number}: event count already set to {}, ignoring", self.value);
            return false;
        }
        match extract_event_count(line) {
            Some(n) => {
                debug!("line {line_number}: event count {n}");
                self.value = n;
                self.from_input = true;
                true
            }
            None => {
                let kept = self.value;
                warn!("line {line_number}: no event count in finalize line, keeping {kept}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_count_after_events() {
        let line = "### Finalize: groups 3, events 12000 (binned 11000) [trials 13000]";
        assert_eq!(extract_event_count(line), Some(12000.0));
    }

    #[test]
    fn accepts_exponent_and_trailing_comma() {
        assert_eq!(extract_event_count("### Finalize: events 1.5e6, groups 2"), Some(1.5e6));
    }

    #[test]
    fn count_at_end_of_line() {
        assert_eq!(extract_event_count("### Finalize events 42"), Some(42.0));
    }

    #[test]
    fn missing_or_bad_count() {
        assert_eq!(extract_event_count("### Finalize: groups 3"), None);
        assert_eq!(extract_event_count("### Finalize: events many"), None);
        assert_eq!(extract_event_count("### Fin"), None);
    }

    #[test]
    fn first_count_wins() {
        let mut ec = EventCount::default();
        assert_eq!(ec.value(), 1.0);
        assert!(!ec.observe(1, "### Finalize: nothing here"));
        assert!(!ec.from_input());
        assert!(ec.observe(2, "### Finalize: events 10 (binned 9)"));
        assert!(!ec.observe(3, "### Finalize: events 20 (binned 19)"));
        assert_eq!(ec.value(), 10.0);
        assert!(ec.from_input());
    }
}
