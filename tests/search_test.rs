mod common;

use jammcli::spotify::{ApiErrorClass, search::search_tracks};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

use common::{api_for, raw_track, request_count};

#[tokio::test]
async fn test_empty_term_makes_no_request() {
    let server = MockServer::start().await;
    let (api, notifier) = api_for(&server);

    assert!(search_tracks(&api, "", "T").await.is_empty());
    assert_eq!(request_count(&server).await, 0);
    assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn test_maps_items_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "daft punk & friends"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {
                "href": "ignored",
                "items": [
                    raw_track("b2", "Harder Better", "Discovery"),
                    raw_track("a1", "Around the World", "Homework")
                ],
                "total": 2
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _notifier) = api_for(&server);
    let tracks = search_tracks(&api, "daft punk & friends", "T").await;

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, "b2");
    assert_eq!(tracks[0].name, "Harder Better");
    assert_eq!(tracks[0].album.name, "Discovery");
    assert_eq!(tracks[0].uri, "spotify:track:b2");
    assert_eq!(tracks[0].artists[0].name, "Harder Better Artist");
    assert_eq!(tracks[1].id, "a1");
    assert_eq!(tracks[1].album.name, "Homework");
    assert_eq!(tracks[1].uri, "spotify:track:a1");
}

#[tokio::test]
async fn test_malformed_items_are_skipped() {
    let server = MockServer::start().await;
    let mut no_id = raw_track("x9", "Nameless", "Lost");
    no_id.as_object_mut().unwrap().remove("id");

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {
                "items": [
                    raw_track("a1", "Around the World", "Homework"),
                    null,
                    no_id,
                    raw_track("b2", "Harder Better", "Discovery")
                ]
            }
        })))
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);
    let tracks = search_tracks(&api, "daft punk", "T").await;

    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "b2"]);
    assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn test_unauthorized_notifies_and_returns_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "The access token expired" }
        })))
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);
    let tracks = search_tracks(&api, "anything", "expired").await;

    assert!(tracks.is_empty());
    assert_eq!(notifier.seen(), vec![ApiErrorClass::Unauthorized]);
}

#[tokio::test]
async fn test_rate_limited_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "5"))
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);

    assert!(search_tracks(&api, "anything", "T").await.is_empty());
    assert_eq!(notifier.seen(), vec![ApiErrorClass::RateLimited]);
}

#[tokio::test]
async fn test_missing_items_returns_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tracks": {} })))
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);

    assert!(search_tracks(&api, "anything", "T").await.is_empty());
    assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn test_server_error_and_garbage_degrade_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "garbage"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let (api, notifier) = api_for(&server);

    assert!(search_tracks(&api, "broken", "T").await.is_empty());
    assert!(search_tracks(&api, "garbage", "T").await.is_empty());
    assert!(notifier.seen().is_empty());
}
