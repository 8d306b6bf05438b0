use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{ServerState, router};
use tower::ServiceExt;

fn app() -> Router {
    router(ServerState {
        default_currency: engine::Currency::Usd,
        max_participants: 3,
    })
}

async fn post_split(body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/splits")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn equal_split_returns_shares_in_order() {
    let (status, body) = post_split(json!({
        "total_minor": 301,
        "split_type": "equal",
        "participants": [{"participant_id": "ada"}, {"participant_id": "bob"}]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["total_minor"], 301);
    assert_eq!(body["total_display"], "3.01 USD");
    assert_eq!(body["shares"][0]["participant_id"], "ada");
    assert_eq!(body["shares"][0]["share_minor"], 151);
    assert_eq!(body["shares"][0]["share_display"], "1.51");
    assert_eq!(body["shares"][1]["share_minor"], 150);
    assert_eq!(body["shares"][1]["split_type"], "equal");
}

#[tokio::test]
async fn request_currency_overrides_default() {
    let (status, body) = post_split(json!({
        "currency": "JPY",
        "total_minor": 1000,
        "split_type": "shares",
        "participants": [
            {"participant_id": "ada", "share_value": 1},
            {"participant_id": "bob", "share_value": 2}
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "JPY");
    assert_eq!(body["shares"][0]["share_minor"], 334);
    assert_eq!(body["shares"][1]["share_minor"], 666);
    assert_eq!(body["shares"][1]["share_display"], "666");
}

#[tokio::test]
async fn amount_mismatch_is_unprocessable() {
    let (status, body) = post_split(json!({
        "total_minor": 100,
        "split_type": "amount",
        "participants": [
            {"participant_id": "ada", "share_value": 40},
            {"participant_id": "bob", "share_value": 30}
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "amount_mismatch");
    assert_eq!(
        body["error"],
        "Participant shares (70) do not sum to expense total (100)"
    );
}

#[tokio::test]
async fn fractional_total_is_unprocessable() {
    let (status, body) = post_split(json!({
        "total_minor": 10.5,
        "split_type": "equal",
        "participants": [{"participant_id": "ada"}]
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "fractional_amount");
}

#[tokio::test]
async fn unknown_split_type_is_unprocessable() {
    let (status, body) = post_split(json!({
        "total_minor": 100,
        "split_type": "itemized",
        "participants": [{"participant_id": "ada"}]
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "unknown_split_type");
}

#[tokio::test]
async fn too_many_participants_is_bad_request() {
    let (status, body) = post_split(json!({
        "total_minor": 100,
        "split_type": "equal",
        "participants": [
            {"participant_id": "a"},
            {"participant_id": "b"},
            {"participant_id": "c"},
            {"participant_id": "d"}
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn percentage_split_is_corrected_to_total() {
    let (status, body) = post_split(json!({
        "total_minor": 100,
        "split_type": "percentage",
        "participants": [
            {"participant_id": "ada", "share_value": 33.34},
            {"participant_id": "bob", "share_value": 33.33},
            {"participant_id": "cy", "share_value": 33.33}
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let shares: Vec<i64> = body["shares"]
        .as_array()
        .unwrap()
        .iter()
        .map(|share| share["share_minor"].as_i64().unwrap())
        .collect();
    assert_eq!(shares, vec![34, 33, 33]);
}

#[tokio::test]
async fn spawned_server_answers_over_tcp() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(ServerState::default(), listener).unwrap();

    let body = json!({
        "total_minor": 300,
        "split_type": "equal",
        "participants": [{"participant_id": "ada"}, {"participant_id": "bob"}]
    })
    .to_string();
    let request = format!(
        "POST /splits HTTP/1.1\r\nhost: {addr}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"currency\":\"EUR\""));
    assert!(response.contains("\"share_minor\":150"));
}
