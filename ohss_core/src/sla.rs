//! Response-time SLA for support tickets.
//!
//! Urgent and high tickets must be updated within 4 hours, medium within
//! 24 hours and low within 72 hours. The clock only runs while the ticket is
//! waiting on the support team (`new` or `in_progress`); pending customer,
//! pending vendor and resolved tickets are never in breach.

use crate::issue::{Issue, Priority};
use chrono::{DateTime, Duration, Utc};

/// Allowed time between updates for a priority.
///
/// Priorities outside the four known buckets get a zero window, so they
/// count as breaching as soon as their last update is in the past.
pub fn response_window(priority: &Priority) -> Duration {
    match priority {
        Priority::Urgent | Priority::High => Duration::hours(4),
        Priority::Medium => Duration::hours(24),
        Priority::Low => Duration::hours(72),
        Priority::Other(_) => Duration::zero(),
    }
}

pub fn is_breaching(issue: &Issue, now: DateTime<Utc>) -> bool {
    if !issue.status.awaits_response() {
        return false;
    }

    issue.last_updated < now - response_window(&issue.priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn issue(priority: &str, status: &str, age: Duration) -> Issue {
        Issue::new(priority, status, now() - age)
    }

    #[test]
    fn test_urgent_in_progress() {
        assert!(is_breaching(
            &issue("urgent", "in_progress", Duration::hours(5)),
            now()
        ));
        assert!(!is_breaching(
            &issue("urgent", "in_progress", Duration::hours(3)),
            now()
        ));
    }

    #[test]
    fn test_windows_per_priority() {
        for (priority, hours) in [("urgent", 4), ("high", 4), ("medium", 24), ("low", 72)] {
            for status in ["new", "in_progress"] {
                let window = Duration::hours(hours);
                let just_inside = issue(priority, status, window - Duration::seconds(1));
                let at_boundary = issue(priority, status, window);
                let just_outside = issue(priority, status, window + Duration::seconds(1));

                assert!(!is_breaching(&just_inside, now()), "{priority}/{status}");
                assert!(!is_breaching(&at_boundary, now()), "{priority}/{status}");
                assert!(is_breaching(&just_outside, now()), "{priority}/{status}");
            }
        }
    }

    #[test]
    fn test_waiting_statuses_never_breach() {
        for status in ["pending_customer", "pending_vendor", "closed", "resolved"] {
            for priority in ["urgent", "high", "medium", "low", "blocker"] {
                let old = issue(priority, status, Duration::hours(1000));
                assert!(!is_breaching(&old, now()), "{priority}/{status}");
            }
        }
    }

    #[test]
    fn test_low_pending_customer_is_exempt() {
        let stale = issue("low", "pending_customer", Duration::hours(1000));
        assert!(!is_breaching(&stale, now()));
    }

    #[test]
    fn test_unknown_priority_has_no_grace_period() {
        assert_eq!(
            response_window(&Priority::Other("blocker".to_string())),
            Duration::zero()
        );

        let stale = issue("blocker", "new", Duration::seconds(1));
        assert!(is_breaching(&stale, now()));

        let fresh = Issue::new("blocker", "new", now());
        assert!(!is_breaching(&fresh, now()));
    }
}
