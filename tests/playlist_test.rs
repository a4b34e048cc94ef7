mod common;

use jammcli::{
    error::PlaylistError,
    spotify::{ApiErrorClass, playlist::create_playlist},
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

use common::{api_for, request_count};

fn uris() -> Vec<String> {
    vec!["spotify:track:1".to_string(), "spotify:track:2".to_string()]
}

#[tokio::test]
async fn test_empty_track_list_rejected_without_network() {
    let server = MockServer::start().await;
    let (api, _notifier) = api_for(&server);

    let result = create_playlist(&api, "X", &[], "T").await;

    assert!(matches!(result, Err(PlaylistError::EmptyTrackList)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_creates_playlist_then_adds_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/playlists"))
        .and(header("authorization", "Bearer T"))
        .and(body_json(json!({ "name": "Road Trip", "public": true })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "P",
            "name": "Road Trip",
            "public": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/P/items"))
        .and(header("authorization", "Bearer T"))
        .and(body_json(json!({
            "uris": ["spotify:track:1", "spotify:track:2"],
            "position": 0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);
    let playlist_id = create_playlist(&api, "Road Trip", &uris(), "T")
        .await
        .unwrap();

    assert_eq!(playlist_id, "P");
    assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn test_item_failure_leaves_created_playlist() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "P" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/P/items"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);
    let result = create_playlist(&api, "X", &uris(), "T").await;

    match result {
        Err(PlaylistError::ItemsNotAdded {
            playlist_id,
            status,
        }) => {
            assert_eq!(playlist_id, "P");
            assert_eq!(status, Some(StatusCode::FORBIDDEN));
        }
        other => panic!("expected partial failure, got {other:?}"),
    }
    assert_eq!(notifier.seen(), vec![ApiErrorClass::Forbidden]);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_create_failure_skips_item_insertion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/playlists"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/P/items"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);
    let result = create_playlist(&api, "X", &uris(), "expired").await;

    assert!(matches!(
        result,
        Err(PlaylistError::CreateFailed { status }) if status == StatusCode::UNAUTHORIZED
    ));
    assert_eq!(notifier.seen(), vec![ApiErrorClass::Unauthorized]);
}

#[tokio::test]
async fn test_create_without_id_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "name": "X" })))
        .mount(&server)
        .await;

    let (api, _notifier) = api_for(&server);
    let result = create_playlist(&api, "X", &uris(), "T").await;

    assert!(matches!(result, Err(PlaylistError::MissingPlaylistId)));
    assert_eq!(request_count(&server).await, 1);
}
