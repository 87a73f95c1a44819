use amino_rs::client::{ApiClient, Error};
use amino_rs::model::MediaType;
use httpmock::prelude::*;
use reqwest::Url;
use serde_json::json;
use serial_test::serial;
use std::env;

const DEVICE_ID: &str =
    "19000102030405060708090A0B0C0D0E0F101112139EA23B4731B63EAF61D1D7C517F9C306C61D0DE9";

// Decodes to a session object with "2" = "f3e2d1c0-1111-2222-3333-444455556666".
const SESSION_TOKEN: &str = "GXsiMSI6IjAiLCIyIjoiZjNlMmQxYzAtMTExMS0yMjIyLTMzMzMtNDQ0NDU1NTU2NjY2IiwiMyI6InN2PTQifWRlZmdoaWprbG1ub3BxcnN0dXZ3";
const SESSION_USER_ID: &str = "f3e2d1c0-1111-2222-3333-444455556666";

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_base_url(Url::parse(&server.base_url()).unwrap())
        .with_device_id(DEVICE_ID.to_string())
}

#[tokio::test]
async fn requests_carry_device_identity_headers() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/g/s/user-profile/uid123")
            .header("NDCDEVICEID", DEVICE_ID)
            .header("Accept-Language", "en-US")
            .header("User-Agent", "Apple iPhone13,4 iOS v15.6.1 Main/3.12.9");
        then.status(200)
            .json_body(json!({"userProfile": {"nickname": "amino user", "level": 7}}));
    });

    let client = client_for(&server);
    let user = client.get_user("uid123").await.unwrap();

    mock.assert();
    assert_eq!(
        user.user_profile.unwrap().nickname.as_deref(),
        Some("amino user")
    );
}

#[tokio::test]
async fn upload_media_signs_the_exact_body_bytes() {
    let server = MockServer::start();

    // Golden signature over the literal body b"test".
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/g/s/media/upload")
            .header("NDC-MSG-SIG", "GRVdEPLrtPA60NB1kcXBe2L2O37O")
            .header("Content-Type", "image/jpg")
            .body("test");
        then.status(200)
            .json_body(json!({"mediaValue": "http://cdn.example/media/1.jpg"}));
    });

    let client = client_for(&server);
    let response = client
        .upload_media(b"test".to_vec(), MediaType::Image)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(
        response.media_value.as_deref(),
        Some("http://cdn.example/media/1.jpg")
    );
}

#[tokio::test]
async fn bodyless_requests_are_not_signed() {
    let server = MockServer::start();

    // Registered first, so a signed request would hit it and fail the call.
    let signed_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/g/s/chat/thread/t1")
            .header_exists("NDC-MSG-SIG");
        then.status(500).body("unexpected signature");
    });

    let unsigned_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/g/s/chat/thread/t1");
        then.status(200).json_body(json!({"threadId": "t1"}));
    });

    let client = client_for(&server);
    let thread = client.get_thread("t1").await.unwrap();

    signed_mock.assert_hits(0);
    unsigned_mock.assert_hits(1);
    assert_eq!(thread.thread_id.as_deref(), Some("t1"));
}

#[tokio::test]
async fn login_stores_session_and_authenticates_later_requests() {
    let server = MockServer::start();

    let login_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/g/s/auth/login")
            .header("Content-Type", "application/json")
            .header_exists("NDC-MSG-SIG")
            .body_contains("\"email\":\"user@example.com\"")
            .body_contains("\"secret\":\"0 hunter2\"")
            .body_contains(&format!("\"deviceID\":\"{DEVICE_ID}\""))
            .body_contains("\"clientType\":100");
        then.status(200).json_body(json!({
            "auid": "u1",
            "sid": "sid-token",
            "account": {"email": "user@example.com"},
            "userProfile": {"nickname": "amino user"}
        }));
    });

    let profile_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/g/s/user-profile/u1")
            .header("NDCAUTH", "sid=sid-token");
        then.status(200)
            .json_body(json!({"userProfile": {"nickname": "amino user"}}));
    });

    let client = client_for(&server);

    assert_eq!(client.session_id().await, None);
    let user = client.login("user@example.com", "hunter2").await.unwrap();
    assert_eq!(user.auid.as_deref(), Some("u1"));
    assert_eq!(client.session_id().await.as_deref(), Some("sid-token"));

    client.get_user("u1").await.unwrap();

    login_mock.assert();
    profile_mock.assert();
}

#[tokio::test]
async fn login_without_session_credentials_is_an_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v1/g/s/auth/login");
        then.status(200).json_body(json!({"account": {}}));
    });

    let client = client_for(&server);
    let result = client.login("user@example.com", "hunter2").await;
    assert!(matches!(result, Err(Error::MissingSession)));
    assert_eq!(client.session_id().await, None);
}

#[tokio::test]
async fn login_with_session_recovers_the_embedded_user_id() {
    let server = MockServer::start();

    let profile_mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/v1/g/s/user-profile/{SESSION_USER_ID}"))
            .header("NDCAUTH", format!("sid={SESSION_TOKEN}"));
        then.status(200)
            .json_body(json!({"userProfile": {"nickname": "resumed"}}));
    });

    let client = client_for(&server);
    let user = client.login_with_session(SESSION_TOKEN).await.unwrap();

    profile_mock.assert();
    assert_eq!(user.user_profile.unwrap().nickname.as_deref(), Some("resumed"));
    assert_eq!(client.session_id().await.as_deref(), Some(SESSION_TOKEN));
}

#[tokio::test]
async fn login_with_garbage_session_fails_without_a_request() {
    let server = MockServer::start();
    let client = client_for(&server);

    let result = client.login_with_session("!!garbage!!").await;
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn join_and_leave_thread_use_the_logged_in_account() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v1/g/s/auth/login");
        then.status(200).json_body(json!({"auid": "u1", "sid": "sid-token"}));
    });

    let join_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/g/s/chat/thread/t9/member/u1")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("NDCAUTH", "sid=sid-token");
        then.status(200).json_body(json!({}));
    });

    let leave_mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/v1/g/s/chat/thread/t9/member/u1")
            .header("NDCAUTH", "sid=sid-token");
        then.status(200).json_body(json!({}));
    });

    let client = client_for(&server);
    client.login("user@example.com", "hunter2").await.unwrap();
    client.join_thread("t9").await.unwrap();
    client.leave_thread("t9").await.unwrap();

    join_mock.assert();
    leave_mock.assert();
}

#[tokio::test]
async fn thread_membership_requires_login() {
    let server = MockServer::start();
    let client = client_for(&server);

    assert!(matches!(
        client.join_thread("t9").await,
        Err(Error::NotLoggedIn)
    ));
    assert!(matches!(
        client.leave_thread("t9").await,
        Err(Error::NotLoggedIn)
    ));
}

#[tokio::test]
async fn invite_to_thread_posts_a_signed_uid_list() {
    let server = MockServer::start();

    let invite_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/g/s/chat/thread/t2/member/invite")
            .header("Content-Type", "application/json")
            .header_exists("NDC-MSG-SIG")
            .body_contains("\"uids\":[\"u2\",\"u3\"]");
        then.status(200).json_body(json!({}));
    });

    let client = client_for(&server);
    client
        .invite_to_thread("t2", &["u2".to_string(), "u3".to_string()])
        .await
        .unwrap();

    invite_mock.assert();
}

#[tokio::test]
async fn listing_endpoints_pass_paging_parameters() {
    let server = MockServer::start();

    let communities_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/g/s/community/joined")
            .query_param("v", "1")
            .query_param("start", "0")
            .query_param("size", "25");
        then.status(200).json_body(json!({
            "communityList": [{"name": "Rustaceans", "ndcId": 42}]
        }));
    });

    let threads_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/g/s/chat/thread")
            .query_param("type", "joined-me")
            .query_param("start", "5")
            .query_param("size", "10");
        then.status(200)
            .json_body(json!({"threadList": [{"threadId": "t1"}]}));
    });

    let members_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/g/s/chat/thread/t1/member")
            .query_param("start", "0")
            .query_param("size", "100")
            .query_param("type", "default")
            .query_param("cv", "1.2");
        then.status(200)
            .json_body(json!({"memberList": [{"uid": "u1", "nickname": "m"}]}));
    });

    let client = client_for(&server);

    let communities = client.get_communities(0, 25).await.unwrap();
    assert_eq!(communities.community_list.unwrap()[0].ndc_id, Some(42));

    let threads = client.get_threads(5, 10).await.unwrap();
    assert_eq!(
        threads.thread_list.unwrap()[0].thread_id.as_deref(),
        Some("t1")
    );

    let members = client.get_thread_members("t1", 0, 100).await.unwrap();
    assert_eq!(members.member_list.unwrap()[0].uid.as_deref(), Some("u1"));

    communities_mock.assert();
    threads_mock.assert();
    members_mock.assert();
}

#[tokio::test]
async fn non_success_status_maps_to_request_failed() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/v1/g/s/user-profile/blocked");
        then.status(403).body("Access denied");
    });

    let client = client_for(&server);
    match client.get_user("blocked").await {
        Err(Error::RequestFailed { status, body, path }) => {
            assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
            assert_eq!(body, "Access denied");
            assert!(path.contains("user-profile/blocked"));
        }
        other => panic!("Expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_response_maps_to_parsing_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/v1/g/s/user-profile/u1");
        then.status(200).body("not json");
    });

    let client = client_for(&server);
    assert!(matches!(
        client.get_user("u1").await,
        Err(Error::ResponseParsingFailed(_))
    ));
}

#[test]
#[serial]
fn client_new_reads_base_url_from_env() {
    dotenvy::dotenv().ok();
    env::set_var("AMINO_API_BASE_URL", "http://127.0.0.1:1234");
    assert!(ApiClient::new().is_ok());

    env::set_var("AMINO_API_BASE_URL", "not a url");
    assert!(matches!(ApiClient::new(), Err(Error::UrlParse(_))));

    env::remove_var("AMINO_API_BASE_URL");
}
