//! Shared HTTP client construction and error mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::ConfidantError;

/// Build a reqwest client with a whole-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ConfidantError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()?)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status and body to an error.
pub fn status_to_error(status: u16, body: &str) -> ConfidantError {
    match status {
        401 | 403 => ConfidantError::Authentication(body.to_string()),
        429 => ConfidantError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => ConfidantError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_authentication() {
        assert!(matches!(
            status_to_error(401, "bad key"),
            ConfidantError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(403, "forbidden"),
            ConfidantError::Authentication(_)
        ));
    }

    #[test]
    fn rate_limit_reads_retry_after_seconds() {
        let err = status_to_error(429, r#"{"error":{"retry_after":1.5}}"#);
        assert!(matches!(
            err,
            ConfidantError::RateLimited {
                retry_after_ms: Some(1500)
            }
        ));
    }

    #[test]
    fn other_statuses_keep_body() {
        let err = status_to_error(502, "upstream exploded");
        assert_eq!(err.to_string(), "upstream returned 502: upstream exploded");
        assert!(err.is_retryable());
    }
}
