use axum::http::StatusCode;
use serde_json::json;
use sweepstake_odds::PlatformError;

use crate::helpers::{detail, get_json, participants, test_app, MockPlatformClient};

#[tokio::test]
async fn test_missing_compid() {
    let mut platform = MockPlatformClient::new();
    platform.expect_participant_page().never();
    platform.expect_sweepstake().never();

    let (status, body) = get_json(test_app(platform), "/api/calculate?entries=5").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing compid parameter"}));
}

#[tokio::test]
async fn test_empty_compid() {
    let platform = MockPlatformClient::new();

    let (status, body) = get_json(test_app(platform), "/api/calculate?compid=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing compid parameter"}));
}

#[tokio::test]
async fn test_calculate_single_prize() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .times(2)
        .returning(|_, page| match page {
            1 => Ok(participants(&[40, 20], 2)),
            _ => Ok(participants(&[30], 2)),
        });
    platform
        .expect_sweepstake()
        .times(1)
        .returning(|_| Ok(detail("Cash Drop", 1, &[(100, 20.0), (50, 10.0)])));

    let (status, body) = get_json(
        test_app(platform),
        "/api/calculate?compid=cash-drop&entries=10",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compId"], json!("cash-drop"));
    assert_eq!(body["compName"], json!("Cash Drop"));
    assert_eq!(body["othersEntries"], json!(90));
    assert_eq!(body["yourEntries"], json!(10));
    assert_eq!(body["overallEntries"], json!(100));
    assert_eq!(body["currentOdds"], json!(0.1));
    assert_eq!(body["currentAnyPlaceOdds"], json!(0.1));
    assert_eq!(body["prizeCount"], json!(1));
    assert_eq!(body["isMultiPrize"], json!(false));

    let packages = body["packages"].as_array().expect("packages");
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0]["entries"], json!(50));
    assert_eq!(packages[0]["price"], json!(10.0));
    assert_eq!(packages[0]["probability"], json!(0.4));
    assert_eq!(packages[0]["oneIn"], json!(2.5));
    assert_eq!(packages[0]["costBasedOnOdds"], json!(25.0));
    assert_eq!(packages[0]["anyPlaceProb"], json!(0.4));
    assert_eq!(packages[0]["anyPlaceOneIn"], json!(2.5));
    assert_eq!(packages[1]["price"], json!(20.0));
}

#[tokio::test]
async fn test_calculate_multi_prize() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .times(1)
        .returning(|_, _| Ok(participants(&[90], 1)));
    platform
        .expect_sweepstake()
        .times(1)
        .returning(|_| Ok(detail("Top Three", 3, &[])));

    let (status, body) =
        get_json(test_app(platform), "/api/calculate?compid=top-three&entries=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prizeCount"], json!(3));
    assert_eq!(body["isMultiPrize"], json!(true));
    let any_place = body["currentAnyPlaceOdds"].as_f64().expect("number");
    assert!((any_place - 0.271).abs() < 1e-12);
    assert_eq!(body["packages"], json!([]));
}

#[tokio::test]
async fn test_unreachable_odds_are_null() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .times(1)
        .returning(|_, _| Ok(participants(&[], 0)));
    platform
        .expect_sweepstake()
        .times(1)
        .returning(|_| Ok(detail("Empty", 2, &[(0, 5.0)])));

    let (status, body) = get_json(test_app(platform), "/api/calculate?compid=empty").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallEntries"], json!(0));
    assert_eq!(body["currentOdds"], json!(0.0));
    let row = &body["packages"][0];
    assert_eq!(row["probability"], json!(0.0));
    assert!(row["oneIn"].is_null());
    assert!(row["costBasedOnOdds"].is_null());
    assert!(row["anyPlaceOneIn"].is_null());
}

#[tokio::test]
async fn test_garbage_entries_default_to_zero() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .times(1)
        .returning(|_, _| Ok(participants(&[25], 1)));
    platform
        .expect_sweepstake()
        .times(1)
        .returning(|_| Ok(detail("Any", 1, &[])));

    let (status, body) =
        get_json(test_app(platform), "/api/calculate?compid=any&entries=lots").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["yourEntries"], json!(0));
    assert_eq!(body["overallEntries"], json!(25));
}

#[tokio::test]
async fn test_repeated_entries_default_to_zero() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .withf(|id, page| id.to_string() == "any" && *page == 1)
        .times(1)
        .returning(|_, _| Ok(participants(&[25], 1)));
    platform
        .expect_sweepstake()
        .times(1)
        .returning(|_| Ok(detail("Any", 1, &[])));

    let (status, body) = get_json(
        test_app(platform),
        "/api/calculate?compid=any&entries=1&entries=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compId"], json!("any"));
    assert_eq!(body["yourEntries"], json!(0));
    assert_eq!(body["overallEntries"], json!(25));
}

#[tokio::test]
async fn test_repeated_compid_keeps_last() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .withf(|id, _| id.to_string() == "second")
        .times(1)
        .returning(|_, _| Ok(participants(&[4], 1)));
    platform
        .expect_sweepstake()
        .withf(|id| id.to_string() == "second")
        .times(1)
        .returning(|_| Ok(detail("Second", 1, &[])));

    let (status, body) = get_json(
        test_app(platform),
        "/api/calculate?compid=first&compid=second&entries=4",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compId"], json!("second"));
    assert_eq!(body["yourEntries"], json!(4));
}

#[tokio::test]
async fn test_failure_mid_pagination_returns_500() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .times(2)
        .returning(|_, page| match page {
            1 => Ok(participants(&[10, 10], 5)),
            _ => Err(PlatformError::Request(String::from(
                "error response from platform with status 503 Service Unavailable: \"\"",
            ))),
        });
    platform.expect_sweepstake().never();

    let (status, body) =
        get_json(test_app(platform), "/api/calculate?compid=flaky&entries=1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "problem requesting platform: error response from platform with status 503 Service Unavailable: \"\""
        })
    );
}

#[tokio::test]
async fn test_metadata_not_found_returns_500() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_participant_page()
        .times(1)
        .returning(|_, _| Ok(participants(&[1], 1)));
    platform.expect_sweepstake().times(1).returning(|_| {
        Err(PlatformError::NotFound(String::from(
            "sweepstake with id gone not found",
        )))
    });

    let (status, body) = get_json(test_app(platform), "/api/calculate?compid=gone").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "item not found: sweepstake with id gone not found"})
    );
}
