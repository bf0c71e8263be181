use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use http::{Method, StatusCode, Uri};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::alertmanager::{self, AlertStatus};
use crate::{metrics, translate};

pub async fn health() -> &'static str {
    "OK"
}

pub async fn export_metrics() -> Response {
    match metrics::gather_metrics() {
        Ok(body) => body.into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Decode an Alertmanager webhook, render it and forward it to Apprise.
///
/// Always answers `200 OK` with an empty body: a payload that cannot be
/// decoded is dropped, and delivery failures are only logged.
pub async fn relay(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> StatusCode {
    info!(%method, path = %uri.path(), bytes = body.len(), "Received webhook");
    metrics::REQUESTS_TOTAL.inc();

    let notification = match alertmanager::decode(&body) {
        Ok(notification) => notification,
        Err(e) => {
            warn!(error = %e, "Error parsing body, dropping request");
            metrics::DECODE_FAILURES_TOTAL.inc();
            return StatusCode::OK;
        }
    };

    for (status, count) in notification.count_by_status() {
        let label = match &status {
            AlertStatus::Firing | AlertStatus::Resolved => status.as_str(),
            AlertStatus::Other(_) => "other",
        };
        metrics::ALERTS_TOTAL
            .with_label_values(&[label])
            .inc_by(count as u64);
    }

    let message = translate::translate(&notification, &state.tag);
    debug!(
        group_key = %notification.group_key,
        alerts = notification.alerts.len(),
        "Forwarding notification to Apprise"
    );

    match state.notifier.send(&message).await {
        Ok(()) => metrics::record_delivery(true),
        Err(e) => {
            error!(
                group_key = %notification.group_key,
                error = %e,
                "Error notifying Apprise"
            );
            metrics::record_delivery(false);
        }
    }

    StatusCode::OK
}
