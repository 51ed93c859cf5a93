use service_core::error::AppError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which dependency a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Inference,
    SourceHost,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Inference => f.write_str("inference endpoint"),
            Upstream::SourceHost => f.write_str("source host"),
        }
    }
}

/// Failure of one of the outbound calls made while serving a request.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{upstream} unavailable: {message}")]
    UpstreamUnavailable { upstream: Upstream, message: String },

    #[error("{upstream} timed out after {}s", .timeout.as_secs())]
    UpstreamTimeout { upstream: Upstream, timeout: Duration },

    #[error("{upstream} rejected request with status {status}: {message}")]
    UpstreamRejected {
        upstream: Upstream,
        status: u16,
        message: String,
    },
}

impl GatewayError {
    pub fn upstream(&self) -> Upstream {
        match self {
            GatewayError::UpstreamUnavailable { upstream, .. }
            | GatewayError::UpstreamTimeout { upstream, .. }
            | GatewayError::UpstreamRejected { upstream, .. } => *upstream,
        }
    }

    /// Classify a transport-level reqwest failure.
    pub fn from_transport(upstream: Upstream, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::UpstreamTimeout { upstream, timeout }
        } else {
            GatewayError::UpstreamUnavailable {
                upstream,
                message: err.to_string(),
            }
        }
    }

    /// Classify a non-success HTTP status. Client errors are rejections;
    /// anything else means the dependency is not serving.
    pub fn from_status(upstream: Upstream, status: reqwest::StatusCode, body: String) -> Self {
        if status.is_client_error() {
            GatewayError::UpstreamRejected {
                upstream,
                status: status.as_u16(),
                message: body,
            }
        } else {
            GatewayError::UpstreamUnavailable {
                upstream,
                message: format!("status {}: {}", status, body),
            }
        }
    }

    pub fn malformed(upstream: Upstream, err: impl fmt::Display) -> Self {
        GatewayError::UpstreamUnavailable {
            upstream,
            message: format!("malformed response: {}", err),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::UpstreamTimeout { .. } => AppError::GatewayTimeout(err.to_string()),
            GatewayError::UpstreamUnavailable { .. } | GatewayError::UpstreamRejected { .. } => {
                AppError::BadGateway(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn client_errors_are_rejections() {
        let err = GatewayError::from_status(
            Upstream::SourceHost,
            reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            "Reference already exists".into(),
        );
        assert!(matches!(
            err,
            GatewayError::UpstreamRejected { status: 422, .. }
        ));
        assert_eq!(err.upstream(), Upstream::SourceHost);
    }

    #[test]
    fn server_errors_are_unavailability() {
        let err = GatewayError::from_status(
            Upstream::Inference,
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "model not loaded".into(),
        );
        assert!(matches!(err, GatewayError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("model not loaded"));
    }

    #[test]
    fn maps_onto_gateway_statuses() {
        let timeout: AppError = GatewayError::UpstreamTimeout {
            upstream: Upstream::Inference,
            timeout: Duration::from_secs(120),
        }
        .into();
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert!(timeout.to_string().contains("inference endpoint timed out after 120s"));

        let rejected: AppError = GatewayError::UpstreamRejected {
            upstream: Upstream::SourceHost,
            status: 404,
            message: "Not Found".into(),
        }
        .into();
        assert_eq!(rejected.status_code(), StatusCode::BAD_GATEWAY);
    }
}
