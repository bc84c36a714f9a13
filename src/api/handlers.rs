//! API handlers for particle submission and reporting

use std::sync::Arc;
use axum::{
    body::Body,
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use tracing::{debug, error, trace};

use crate::api::models::CountReport;
use crate::sensors::{ParticleClass, ParticleCounter};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub counter: Arc<ParticleCounter>,
    pub target_label: Arc<str>,
}

impl AppState {
    pub fn new(counter: Arc<ParticleCounter>, target_label: &str) -> Self {
        Self {
            counter,
            target_label: Arc::from(target_label),
        }
    }
}

/// Count one detected particle; the body is its label.
///
/// Never rejects: unknown labels, undecodable bytes and bodies of any size
/// count as other.
pub async fn submit_particle(State(state): State<AppState>, body: Body) -> StatusCode {
    let class = match read_label(body, state.target_label.len()).await {
        Some(label) => ParticleClass::classify(&String::from_utf8_lossy(&label), &state.target_label),
        None => ParticleClass::Other,
    };
    state.counter.increment(class);
    trace!(?class, "Particle captured");
    StatusCode::OK
}

/// Collect at most `limit` bytes of the body.
///
/// Returns `None` when the body is longer than `limit` or breaks off, since
/// it then cannot spell the target label. Excess bytes are drained unstored.
async fn read_label(body: Body, limit: usize) -> Option<Vec<u8>> {
    let mut chunks = body.into_data_stream();
    let mut label = Vec::new();
    let mut overflow = false;

    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(_) if overflow => {}
            Ok(chunk) if label.len() + chunk.len() > limit => overflow = true,
            Ok(chunk) => label.extend_from_slice(&chunk),
            Err(e) => {
                debug!("Particle body broke off: {}", e);
                return None;
            }
        }
    }

    (!overflow).then_some(label)
}

/// Report the current counts
pub async fn report_counts(State(state): State<AppState>) -> Response {
    let report = CountReport {
        target_label: state.target_label.clone(),
        snapshot: state.counter.snapshot(),
    };

    match report.to_json() {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!("Failed to render count report: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Reject everything that is not a submit or a report
pub async fn unsupported_method(method: Method) -> StatusCode {
    debug!("Rejecting unsupported method {}", method);
    StatusCode::METHOD_NOT_ALLOWED
}
