//! Tests for the error system.

use compound_agent::error::unified::*;
use compound_agent::error::*;

#[test]
fn error_api_creation() {
    let err = AgentError::api(404, "Not found");
    assert!(matches!(&err, AgentError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: AgentError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: AgentError::Authentication("bad-key".to_string()),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: AgentError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgentError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::IncreaseTimeout,
        },
        Case {
            error: AgentError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: AgentError::Network(network_error),
            expected_category: ErrorCategory::Network,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgentError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: AgentError::ToolExecution {
                tool_name: "calculate_future_value".to_string(),
                message: "failed".to_string(),
            },
            expected_category: ErrorCategory::ToolExecution,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckToolImplementation,
        },
        Case {
            error: AgentError::ToolNotFound("get_weather".to_string()),
            expected_category: ErrorCategory::ToolExecution,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckToolImplementation,
        },
        Case {
            error: AgentError::InvalidArgument("periods must not be negative".to_string()),
            expected_category: ErrorCategory::InvalidInput,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::FixArguments,
        },
        Case {
            error: AgentError::api(401, "Unauthorized"),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: AgentError::api(429, "Rate limited"),
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgentError::api(503, "Server unavailable"),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgentError::api(418, "Teapot"),
            expected_category: ErrorCategory::Api,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: AgentError::Io(io_error),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: AgentError::InvalidState("run lists no tool calls".to_string()),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category);
        assert_eq!(case.error.is_retryable(), case.expected_retryable);
        assert_eq!(case.error.recovery_suggestion(), case.expected_recovery);
    }
}

#[test]
fn error_api_with_details_sets_detail_fields() {
    let details = ErrorDetails {
        code: Some(ErrorCode::InvalidRequest),
        service_code: Some("invalid_request".to_string()),
        param: Some("assistant_id".to_string()),
        request_id: Some("req-123".to_string()),
    };
    let err = AgentError::api_with_details(400, "bad request", details);

    match err {
        AgentError::Api {
            status,
            message,
            details: Some(details),
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad request");
            assert_eq!(details.code, Some(ErrorCode::InvalidRequest));
            assert_eq!(details.service_code.as_deref(), Some("invalid_request"));
            assert_eq!(details.param.as_deref(), Some("assistant_id"));
            assert_eq!(details.request_id.as_deref(), Some("req-123"));
        }
        other => panic!("expected api error with details, got {other:?}"),
    }
}

#[test]
fn unknown_service_codes_deserialize_as_unknown() {
    let code: ErrorCode = serde_json::from_value(serde_json::json!("content_filter")).unwrap();
    assert_eq!(code, ErrorCode::Unknown);
}
