//! Tests for `RetryPolicy`.

use super::RetryPolicy;
use std::time::Duration;

mod retry_policy_defaults {
    use super::*;

    #[test]
    fn new_creates_policy_with_defaults() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.max_retries, RetryPolicy::DEFAULT_MAX_RETRIES);
        assert_eq!(policy.base_delay, RetryPolicy::DEFAULT_BASE_DELAY);
    }

    #[test]
    fn default_trait_matches_new() {
        assert_eq!(RetryPolicy::new(), RetryPolicy::default());
    }

    #[test]
    fn default_max_retries_is_2() {
        assert_eq!(RetryPolicy::DEFAULT_MAX_RETRIES, 2);
        assert_eq!(RetryPolicy::new().max_attempts(), 3);
    }

    #[test]
    fn default_base_delay_is_300_ms() {
        assert_eq!(RetryPolicy::DEFAULT_BASE_DELAY, Duration::from_millis(300));
    }

    #[test]
    fn none_disables_retries() {
        let policy = RetryPolicy::none();

        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.max_attempts(), 1);
    }
}

mod retry_policy_builder {
    use super::*;

    #[test]
    fn builder_chains_correctly() {
        let policy = RetryPolicy::new()
            .with_max_retries(5)
            .with_base_delay(Duration::from_millis(50));

        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(50));
    }

    #[test]
    fn max_attempts_saturates() {
        let policy = RetryPolicy::new().with_max_retries(u32::MAX);

        assert_eq!(policy.max_attempts(), u32::MAX);
    }
}

mod delay_for_retry {
    use super::*;

    #[test]
    fn grows_linearly_with_retry_number() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(300));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(600));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(900));
        assert_eq!(policy.delay_for_retry(10), Duration::from_millis(3000));
    }

    #[test]
    fn is_not_exponential() {
        let policy = RetryPolicy::new().with_base_delay(Duration::from_millis(100));

        // Exponential doubling would give 400ms for the third retry.
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(300));
    }

    #[test]
    fn retry_zero_has_no_delay() {
        assert_eq!(RetryPolicy::new().delay_for_retry(0), Duration::ZERO);
    }

    #[test]
    fn huge_retry_number_saturates() {
        let policy = RetryPolicy::new().with_base_delay(Duration::MAX);

        assert_eq!(policy.delay_for_retry(2), Duration::MAX);
    }
}

mod should_retry {
    use super::*;

    #[test]
    fn retriable_failure_within_budget_is_retried() {
        let policy = RetryPolicy::new().with_max_retries(2);

        assert!(policy.should_retry(0, true));
        assert!(policy.should_retry(1, true));
    }

    #[test]
    fn retriable_failure_past_budget_is_not_retried() {
        let policy = RetryPolicy::new().with_max_retries(2);

        assert!(!policy.should_retry(2, true));
        assert!(!policy.should_retry(100, true));
    }

    #[test]
    fn non_retriable_failure_is_never_retried() {
        let policy = RetryPolicy::new().with_max_retries(5);

        assert!(!policy.should_retry(0, false));
    }

    #[test]
    fn zero_budget_never_retries() {
        assert!(!RetryPolicy::none().should_retry(0, true));
    }
}
