//! API routes configuration

use axum::{
    routing::{get, MethodRouter},
    Router,
};

use crate::api::handlers::*;

/// Create API routes
///
/// The endpoint is mounted on `/` and on every path below it. HEAD is routed
/// explicitly so it is rejected instead of answered by the GET handler.
pub fn create_router(state: AppState) -> Router {
    let endpoint: MethodRouter<AppState> = get(report_counts)
        .head(unsupported_method)
        .post(submit_particle)
        .fallback(unsupported_method);

    Router::new()
        .route("/", endpoint.clone())
        .route("/{*path}", endpoint)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::sensors::{ParticleClass, ParticleCounter, Snapshot};

    fn app() -> (Router, Arc<ParticleCounter>) {
        let counter = Arc::new(ParticleCounter::new());
        let router = create_router(AppState::new(counter.clone(), "CO"));
        (router, counter)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(body.into())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn report(app: &Router) -> Value {
        let (status, body) = send(app, "GET", "/", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_report_before_any_submit() {
        let (app, _) = app();
        assert_eq!(report(&app).await, json!({ "CO": 0, "other": 0 }));
    }

    #[tokio::test]
    async fn test_report_content_type() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_submit_counts_by_class() {
        let (app, counter) = app();

        for label in ["CO", "co", "O2", "N2", "CO2", ""] {
            let (status, body) = send(&app, "POST", "/", label).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.is_empty());
        }

        assert_eq!(counter.snapshot(), Snapshot { target: 2, other: 4 });
        assert_eq!(report(&app).await, json!({ "CO": 2, "other": 4 }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_counts_as_other() {
        let (app, counter) = app();
        let (status, _) = send(&app, "POST", "/", vec![0xff, 0xfe, 0x43]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(counter.snapshot(), Snapshot { target: 0, other: 1 });
    }

    #[tokio::test]
    async fn test_unsupported_methods_rejected_without_mutation() {
        let (app, counter) = app();

        for method in ["HEAD", "PUT", "DELETE", "PATCH", "OPTIONS"] {
            let (status, body) = send(&app, method, "/", "CO").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", method);
            assert!(body.is_empty());
        }

        assert_eq!(counter.snapshot(), Snapshot::default());
    }

    #[tokio::test]
    async fn test_report_layout() {
        let (app, counter) = app();
        counter.increment(ParticleClass::Target);
        for _ in 0..1000 {
            counter.increment(ParticleClass::Other);
        }

        let (_, body) = send(&app, "GET", "/", Body::empty()).await;
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "{\n  \"CO\" : 1,\n  \"other\" : 1000\n}"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_counts_as_other() {
        let (app, counter) = app();
        let mut body = b"CO".to_vec();
        body.resize(3 * 1024 * 1024, b' ');

        let (status, _) = send(&app, "POST", "/", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(counter.snapshot(), Snapshot { target: 0, other: 1 });
    }

    #[tokio::test]
    async fn test_chunked_label_is_reassembled() {
        let (app, counter) = app();
        let chunks = futures::stream::iter(vec![Ok::<_, std::io::Error>("c"), Ok("O")]);

        let (status, _) = send(&app, "POST", "/", Body::from_stream(chunks)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(counter.snapshot(), Snapshot { target: 1, other: 0 });

        let chunks = futures::stream::iter(vec![Ok::<_, std::io::Error>("C"), Ok("O"), Ok("2")]);
        send(&app, "POST", "/", Body::from_stream(chunks)).await;
        assert_eq!(counter.snapshot(), Snapshot { target: 1, other: 1 });
    }

    #[tokio::test]
    async fn test_any_path_is_served() {
        let (app, counter) = app();

        let (status, _) = send(&app, "POST", "/sensors/kitchen", "CO").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(counter.snapshot().target, 1);

        let (status, body) = send(&app, "GET", "/report", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "CO": 1, "other": 0 }));

        let (status, _) = send(&app, "PUT", "/report", Body::empty()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_concurrent_submits() {
        let (app, counter) = app();

        let requests = (0..500).map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let label = if i % 50 == 0 { "CO" } else { "O2" };
                send(&app, "POST", "/", label).await.0
            })
        });

        for status in futures::future::join_all(requests).await {
            assert_eq!(status.unwrap(), StatusCode::OK);
        }

        assert_eq!(counter.snapshot(), Snapshot { target: 10, other: 490 });
    }
}
