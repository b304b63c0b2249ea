//! Tests for utility modules (retry, timeout).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use compound_agent::error::AgentError;
use compound_agent::util::retry::RetryPolicy;
use compound_agent::util::timeout::with_timeout;

#[tokio::test(start_paused = true)]
async fn retry_policy_retries_retryable_errors_until_success() {
    let policy = RetryPolicy {
        max_attempts: 4,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(100),
        multiplier: 2.0,
    };
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_for_task = attempts.clone();

    let task = tokio::spawn(async move {
        policy
            .execute(|| {
                let attempts = attempts_for_task.clone();
                async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                    if attempt < 2 {
                        Err(AgentError::Timeout(100))
                    } else {
                        Ok::<_, AgentError>("ok")
                    }
                }
            })
            .await
    });

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    let result = task.await.unwrap();

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_policy_stops_immediately_for_non_retryable_errors() {
    let policy = RetryPolicy {
        max_attempts: 5,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
        multiplier: 2.0,
    };
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AgentError::Authentication("bad-key".to_string()))
            }
        })
        .await;

    match result {
        Err(AgentError::Authentication(message)) => assert_eq!(message, "bad-key"),
        other => panic!("expected authentication error, got {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retry_policy_returns_last_error_when_attempts_are_exhausted() {
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(50),
        max_backoff: Duration::from_millis(50),
        multiplier: 2.0,
    };
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_for_task = attempts.clone();

    let task = tokio::spawn(async move {
        policy
            .execute(|| {
                let attempts = attempts_for_task.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(AgentError::RateLimited {
                        retry_after_ms: None,
                    })
                }
            })
            .await
    });

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    let result = task.await.unwrap();

    match result {
        Err(AgentError::RateLimited { retry_after_ms }) => assert_eq!(retry_after_ms, None),
        other => panic!("expected rate limit error, got {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn retry_policy_waits_for_retry_after_hint() {
    let policy = RetryPolicy {
        max_attempts: 2,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(1),
        multiplier: 2.0,
    };
    let attempts = Arc::new(AtomicUsize::new(0));
    let start = tokio::time::Instant::now();

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AgentError::RateLimited {
                        retry_after_ms: Some(5_000),
                    })
                } else {
                    Ok::<_, AgentError>(())
                }
            }
        })
        .await;

    assert!(result.is_ok());
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test]
async fn retry_policy_with_zero_attempts_still_runs_once() {
    let policy = RetryPolicy {
        max_attempts: 0,
        ..RetryPolicy::none()
    };
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AgentError>(())
            }
        })
        .await;

    assert!(result.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn with_timeout_maps_elapsed_to_timeout_error() {
    let result: Result<(), AgentError> = with_timeout(Duration::from_millis(500), async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    })
    .await;

    assert!(matches!(result, Err(AgentError::Timeout(500))));
}
