// Response interceptors.
//
// Every HTTP response passes through the client's interceptor chain before
// the body is decoded, whatever its status. The notification interceptor
// turns the server's `X-{app}-alert` / `X-{app}-params` headers into
// success alerts.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use tracing::trace;

/// Observes every response the client receives.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, status: StatusCode, headers: &HeaderMap);
}

/// Receives success alerts raised from response headers.
pub trait AlertSink: Send + Sync {
    /// `key` is a translation key, `param` its single interpolation value.
    fn success(&self, key: &str, param: Option<&str>);
}

impl<S: AlertSink + ?Sized> AlertSink for Arc<S> {
    fn success(&self, key: &str, param: Option<&str>) {
        (**self).success(key, param);
    }
}

/// Raises a success alert whenever a response carries `X-{app}-alert`.
pub struct NotificationInterceptor<S> {
    alert_header: String,
    params_header: String,
    sink: S,
}

impl<S: AlertSink> NotificationInterceptor<S> {
    pub fn new(app_name: &str, sink: S) -> Self {
        Self {
            alert_header: format!("X-{app_name}-alert"),
            params_header: format!("X-{app_name}-params"),
            sink,
        }
    }
}

impl<S: AlertSink> ResponseInterceptor for NotificationInterceptor<S> {
    fn on_response(&self, status: StatusCode, headers: &HeaderMap) {
        // Header values that are not visible ASCII are ignored.
        let Some(key) = headers
            .get(&self.alert_header)
            .and_then(|v| v.to_str().ok())
        else {
            return;
        };
        let param = headers
            .get(&self.params_header)
            .and_then(|v| v.to_str().ok());
        trace!(%status, key, ?param, "alert header");
        self.sink.success(key, param);
    }
}
