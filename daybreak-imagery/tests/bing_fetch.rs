use daybreak_imagery::bing::BingApi;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn archive_mock(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/HPImageArchive.aspx"))
        .and(query_param("format", "js"))
        .and(query_param("idx", "0"))
        .and(query_param("n", "1"))
        .and(query_param("mkt", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn latest_image_resolves_caption_and_absolute_url() {
    let server = MockServer::start().await;
    archive_mock(
        &server,
        json!({
            "images": [{
                "startdate": "20260805",
                "url": "/th?id=OHR.Hills_1920x1080.jpg&pid=hp",
                "copyright": "Sunset over hills (© Someone)",
                "title": ""
            }],
            "tooltips": {"loading": "Loading..."}
        }),
    )
    .await;

    let api = BingApi::with_base(&server.uri(), "en-US").unwrap();
    let daily = api.latest_image().await.unwrap();

    assert_eq!(daily.caption, "Sunset over hills (© Someone)");
    assert_eq!(
        daily.image_url,
        format!("{}/th?id=OHR.Hills_1920x1080.jpg&pid=hp", server.uri())
    );
}

#[tokio::test]
async fn latest_image_is_permissive_about_missing_fields() {
    let server = MockServer::start().await;
    archive_mock(&server, json!({"tooltips": {}})).await;

    let api = BingApi::with_base(&server.uri(), "en-US").unwrap();
    let daily = api.latest_image().await.unwrap();

    // No images entry: the caption decays to empty and the URL decays to the
    // archive host itself. The run proceeds; failures happen downstream.
    assert_eq!(daily.caption, "");
    assert_eq!(daily.image_url, format!("{}/", server.uri()));
}

#[tokio::test]
async fn latest_image_fails_on_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/HPImageArchive.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let api = BingApi::with_base(&server.uri(), "en-US").unwrap();
    let err = api.latest_image().await.unwrap_err();
    assert!(format!("{err:#}").contains("decode error"));
}

#[tokio::test]
async fn latest_image_surfaces_error_bodies_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/HPImageArchive.aspx"))
        .respond_with(ResponseTemplate::new(500).set_body_string("archive is down"))
        .expect(1) // retries are disabled for workflow calls
        .mount(&server)
        .await;

    let api = BingApi::with_base(&server.uri(), "en-US").unwrap();
    let err = api.latest_image().await.unwrap_err();
    assert!(format!("{err:#}").contains("archive is down"));
}

#[tokio::test]
async fn fetch_image_streams_the_body() {
    let server = MockServer::start().await;
    let payload = vec![0xAAu8; 4096];
    Mock::given(method("GET"))
        .and(path("/img1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let api = BingApi::with_base(&server.uri(), "en-US").unwrap();
    let stream = api
        .fetch_image(&format!("{}/img1.jpg", server.uri()))
        .await
        .unwrap();
    assert_eq!(stream.content_length(), Some(payload.len() as u64));
}
