use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mockall::mock;
use serde_json::Value;
use std::sync::Arc;
use sweepstake_odds::{
    app, AppState, Participant, ParticipantPage, Platform, PlatformError as Error,
    SweepstakeDetail, SweepstakeSummary, UpstreamPackage,
};
use tower::ServiceExt;

mock! {
    pub PlatformClient { }

    #[async_trait]
    impl Platform for PlatformClient {
        async fn recent_sweepstakes(&self) -> Result<Vec<SweepstakeSummary>, Error>;
        async fn participant_page(&self, sweepstake_id: &str, page: u64) -> Result<ParticipantPage, Error>;
        async fn sweepstake(&self, sweepstake_id: &str) -> Result<SweepstakeDetail, Error>;
    }
}

pub fn test_app(platform: MockPlatformClient) -> Router {
    app(
        AppState::new(Arc::new(platform)),
        vec![String::from("http://localhost:3000")],
    )
}

/// Sends a GET through the router and returns the status with the decoded json body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

pub fn participants(counts: &[u64], page_count: u64) -> ParticipantPage {
    ParticipantPage {
        items: counts
            .iter()
            .map(|c| Participant { entry_count: *c })
            .collect(),
        page_count,
    }
}

pub fn detail(name: &str, prizes: usize, packages: &[(u64, f64)]) -> SweepstakeDetail {
    SweepstakeDetail {
        name: Some(name.to_string()),
        prizes: vec![serde_json::json!({"title": "prize"}); prizes],
        entry_packages: packages
            .iter()
            .map(|(entry_count, price)| UpstreamPackage {
                entry_count: *entry_count,
                price: *price,
            })
            .collect(),
    }
}
