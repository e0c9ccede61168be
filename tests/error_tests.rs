//! Tests for the error system.

use confidant::error::*;
use pretty_assertions::assert_eq;

#[test]
fn error_api_creation() {
    let err = ConfidantError::api(404, "Not found");
    assert!(matches!(&err, ConfidantError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "upstream returned 404: Not found");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: ConfidantError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: ConfidantError::Authentication("bad-key".to_string()),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: ConfidantError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: ConfidantError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::IncreaseTimeout,
        },
        Case {
            error: ConfidantError::api(503, "unavailable"),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: ConfidantError::api(400, "bad request"),
            expected_category: ErrorCategory::Api,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: ConfidantError::Configuration("missing key".into()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: ConfidantError::tool("tavily_search_results_json", "boom"),
            expected_category: ErrorCategory::ToolExecution,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckToolImplementation,
        },
        Case {
            error: ConfidantError::InvalidArgument("query".into()),
            expected_category: ErrorCategory::InvalidInput,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::FixInput,
        },
        Case {
            error: ConfidantError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category, "{}", case.error);
        assert_eq!(case.error.is_retryable(), case.expected_retryable, "{}", case.error);
        assert_eq!(
            case.error.recovery_suggestion(),
            case.expected_recovery,
            "{}",
            case.error
        );
    }
}

#[test]
fn tool_error_names_the_tool() {
    let err = ConfidantError::tool("tavily_search_results_json", "connection reset");
    assert_eq!(
        err.to_string(),
        "tool 'tavily_search_results_json' failed: connection reset"
    );
}

#[test]
fn every_suggestion_has_a_hint() {
    for suggestion in [
        RecoverySuggestion::RetryWithBackoff,
        RecoverySuggestion::CheckCredentials,
        RecoverySuggestion::CheckConfiguration,
        RecoverySuggestion::IncreaseTimeout,
        RecoverySuggestion::CheckToolImplementation,
        RecoverySuggestion::FixInput,
        RecoverySuggestion::ContactSupport,
    ] {
        assert!(!suggestion.hint().is_empty());
    }
}
