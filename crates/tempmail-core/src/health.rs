use axum::extract::State;
use axum::http::StatusCode;

/// Backing-store check consulted by [`readyz`].
pub trait ReadinessProbe: Clone + Send + Sync + 'static {
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}

/// Liveness: `GET /healthz` always answers 200.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness: `GET /readyz` answers 503 until the probe reports ready.
pub async fn readyz<P: ReadinessProbe>(State(probe): State<P>) -> StatusCode {
    if probe.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
