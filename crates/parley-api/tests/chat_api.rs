use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use parley_api::http::router::build_router;

mod support;

use support::{ScriptedProvider, body_json, body_text, empty_request, json_request, test_state};

#[tokio::test]
async fn test_chat_round_trip_persists_both_turns_in_order() {
    let state = test_state(ScriptedProvider::reply("Hi there!")).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "sessionId": session.id, "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["response"], "Hi there!");
    assert!(json["timestamp"].as_str().is_some());

    let messages = body_json(
        app.oneshot(empty_request("GET", &format!("/api/messages/{}", session.id)))
            .await
            .unwrap(),
    )
    .await;
    let messages = messages["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Hello");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Hi there!");
}

#[tokio::test]
async fn test_chat_with_empty_message_and_no_images_is_400() {
    let state = test_state(ScriptedProvider::reply("unused")).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "sessionId": session.id, "message": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_without_session_id_is_400() {
    let state = test_state(ScriptedProvider::reply("unused")).await;
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_to_unknown_session_is_404_with_error_body() {
    let state = test_state(ScriptedProvider::reply("unused")).await;
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "sessionId": uuid::Uuid::now_v7(), "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Session not found or expired");
}

#[tokio::test]
async fn test_chat_to_expired_session_is_404() {
    let state = test_state(ScriptedProvider::reply("unused")).await;
    let session = state.chat_service.create_session(Some(0)).await.unwrap();
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "sessionId": session.id, "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_accepts_long_messages() {
    let state = test_state(ScriptedProvider::reply("ok")).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "sessionId": session.id, "message": "A".repeat(1000) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chat_image_only_stores_placeholder() {
    let state = test_state(ScriptedProvider::reply("A nice picture.")).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({
                "sessionId": session.id,
                "images": ["data:image/png;base64,iVBORw0KGgo="]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let messages = body_json(
        app.oneshot(empty_request("GET", &format!("/api/messages/{}", session.id)))
            .await
            .unwrap(),
    )
    .await;
    let messages = messages["messages"].as_array().unwrap();
    assert_eq!(messages[0]["content"], "[Sent 1 image]");
}

#[tokio::test]
async fn test_chat_rejects_invalid_image() {
    let state = test_state(ScriptedProvider::reply("unused")).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({
                "sessionId": session.id,
                "images": ["data:image/tiff;base64,iVBORw0KGgo="]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_provider_failure_is_500_and_keeps_user_turn() {
    let state = test_state(ScriptedProvider::failing()).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "sessionId": session.id, "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to generate AI response");

    // The user's message was durably saved before generation; there is no
    // compensating rollback.
    let messages = body_json(
        app.oneshot(empty_request("GET", &format!("/api/messages/{}", session.id)))
            .await
            .unwrap(),
    )
    .await;
    let messages = messages["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
}

#[tokio::test]
async fn test_stream_emits_chunk_frames_then_done_and_persists() {
    let state = test_state(ScriptedProvider::chunks(&["Hel", "lo ", "world"])).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat/stream",
            json!({ "sessionId": session.id, "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let body = body_text(response).await;
    let hel = body.find(r#"data: {"chunk":"Hel"}"#).unwrap();
    let lo = body.find(r#"data: {"chunk":"lo "}"#).unwrap();
    let world = body.find(r#"data: {"chunk":"world"}"#).unwrap();
    let done = body.find(r#"data: {"done":true}"#).unwrap();
    assert!(hel < lo && lo < world && world < done);

    // The concatenation was persisted as the assistant turn.
    let messages = body_json(
        app.oneshot(empty_request("GET", &format!("/api/messages/{}", session.id)))
            .await
            .unwrap(),
    )
    .await;
    let messages = messages["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Hello world");
}

#[tokio::test]
async fn test_stream_error_emits_error_frame_and_skips_persistence() {
    let state = test_state(ScriptedProvider::failing()).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat/stream",
            json!({ "sessionId": session.id, "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#"data: {"error":"Failed to generate AI response"}"#));
    assert!(!body.contains(r#"{"done":true}"#));

    // Only the user turn is persisted; the failed generation is not.
    let messages = body_json(
        app.oneshot(empty_request("GET", &format!("/api/messages/{}", session.id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(messages["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stream_to_unknown_session_is_404() {
    let state = test_state(ScriptedProvider::reply("unused")).await;
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat/stream",
            json!({ "sessionId": uuid::Uuid::now_v7(), "message": "Hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_turn_sees_prior_history() {
    // Two sequential chats against one session; the second request's
    // history is the first exchange.
    let state = test_state(ScriptedProvider::reply("Reply")).await;
    let session = state.chat_service.create_session(None).await.unwrap();
    let app = build_router(state);

    for message in ["First", "Second"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/chat",
                json!({ "sessionId": session.id, "message": message }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let messages = body_json(
        app.oneshot(empty_request("GET", &format!("/api/messages/{}", session.id)))
            .await
            .unwrap(),
    )
    .await;
    let contents: Vec<&str> = messages["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["First", "Reply", "Second", "Reply"]);
}
