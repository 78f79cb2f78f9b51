use daybreak_http::Body;
use daybreak_social::{ShareClient, WeiboApi};
use wiremock::matchers::{body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "2.00_test_token";
const SOURCE: &str = " via-daybreak";

#[tokio::test]
async fn share_text_posts_urlencoded_status_with_oauth2_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/statuses/share.json"))
        .and(header("authorization", format!("OAuth2 {TOKEN}").as_str()))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("status=Sunset+over+hills+via-daybreak"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":123}"#))
        .expect(1)
        .mount(&server)
        .await;

    let api = WeiboApi::with_base(&server.uri(), TOKEN, SOURCE).unwrap();
    // 200 means success; the response body is discarded regardless of content.
    api.share_text("Sunset over hills").await.unwrap();
}

#[tokio::test]
async fn share_picture_posts_multipart_status_and_pic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/statuses/share.json"))
        .and(header("authorization", format!("OAuth2 {TOKEN}").as_str()))
        .and(body_string_contains("name=\"status\""))
        .and(body_string_contains("Sunset over hills via-daybreak"))
        .and(body_string_contains("name=\"pic\""))
        .and(body_string_contains("image-bytes-go-here"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = WeiboApi::with_base(&server.uri(), TOKEN, SOURCE).unwrap();
    api.share_picture("Sunset over hills", Body::from("image-bytes-go-here"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn non_success_surfaces_platform_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/statuses/share.json"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string(r#"{"error":"invalid token"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = WeiboApi::with_base(&server.uri(), "expired", SOURCE).unwrap();
    let err = api.share_text("hello").await.unwrap_err();
    assert!(format!("{err:#}").contains(r#"{"error":"invalid token"}"#));
}

#[tokio::test]
async fn share_picture_failure_carries_body_too() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/statuses/share.json"))
        .respond_with(ResponseTemplate::new(400).set_body_string("pic field missing"))
        .expect(1)
        .mount(&server)
        .await;

    let api = WeiboApi::with_base(&server.uri(), TOKEN, SOURCE).unwrap();
    let err = api
        .share_picture("hello", Body::from("bytes"))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("pic field missing"));
}
