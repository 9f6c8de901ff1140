#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{bearer, register_user, send};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[actix_rt::test]
async fn test_register_create_and_list_scenario() {
    let state = common::test_state();
    let app = init_app!(state);
    let alice = register_user(&app, "alice", "a@x.com", "Abc123").await;

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&alice.token))
        .set_json(json!({ "title": "buy milk" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Create failed: {}", body);
    assert_eq!(body["message"], "Todo created successfully");
    assert_eq!(body["todo"]["title"], "buy milk");
    assert_eq!(body["todo"]["completed"], false);
    assert_eq!(body["todo"]["user_id"], alice.id);

    let id = body["todo"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "Abc123" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let login_token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&login_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["todos"].as_array().unwrap().len(), 1);
    assert_eq!(body["todos"][0]["title"], "buy milk");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/todos/{}/toggle", id))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["completed"], true);

    let bob = register_user(&app, "bob", "b@x.com", "Abc123").await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/{}", id))
        .insert_header(bearer(&bob.token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todos/{}", id))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/{}", id))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_todo_crud_flow() {
    let state = common::test_state();
    let app = init_app!(state);
    let alice = register_user(&app, "alice", "a@x.com", "Abc123").await;

    let mut ids = Vec::new();
    for title in ["  first  ", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(bearer(&alice.token))
            .set_json(json!({ "title": title }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["todo"]["id"].as_i64().unwrap());
    }

    // Newest first, titles stored trimmed
    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&alice.token))
        .to_request();
    let (_, body) = send(&app, req).await;
    let titles: Vec<&str> = body["todos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert_eq!(body["count"], 3);

    let first = ids[0];
    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/{}", first))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["title"], "first");

    let req = test::TestRequest::put()
        .uri(&format!("/api/todos/{}", first))
        .insert_header(bearer(&alice.token))
        .set_json(json!({ "title": "first, renamed", "completed": true }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "Update failed: {}", body);
    assert_eq!(body["message"], "Todo updated successfully");
    assert_eq!(body["todo"]["title"], "first, renamed");
    assert_eq!(body["todo"]["completed"], true);

    // Partial update leaves the other field alone
    let req = test::TestRequest::put()
        .uri(&format!("/api/todos/{}", first))
        .insert_header(bearer(&alice.token))
        .set_json(json!({ "completed": false }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["title"], "first, renamed");
    assert_eq!(body["todo"]["completed"], false);

    for payload in [json!({}), json!({ "title": "   " }), json!({ "title": "x".repeat(256) })] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", first))
            .insert_header(bearer(&alice.token))
            .set_json(&payload)
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
    }

    let req = test::TestRequest::put()
        .uri(&format!("/api/todos/{}", first))
        .insert_header(bearer(&alice.token))
        .set_json(json!({}))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(
        body["error"],
        "At least one field (title or completed) must be provided"
    );

    let req = test::TestRequest::patch()
        .uri(&format!("/api/todos/{}/toggle", ids[1]))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo status toggled successfully");
    assert_eq!(body["todo"]["completed"], true);

    let req = test::TestRequest::get()
        .uri("/api/todos/stats")
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "statistics": { "total": 3, "completed": 1, "pending": 2 } })
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todos/{}", first))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Todo deleted successfully" }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/{}", first))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Todo not found");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todos/{}", first))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_create_todo_validation() {
    let state = common::test_state();
    let app = init_app!(state);
    let alice = register_user(&app, "alice", "a@x.com", "Abc123").await;

    for payload in [
        json!({}),
        json!({ "title": "" }),
        json!({ "title": "   " }),
        json!({ "title": "x".repeat(256) }),
        json!({ "title": 42 }),
        json!({ "title": "mine now", "user_id": 999 }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(bearer(&alice.token))
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert!(body["error"].is_string());
    }

    // Exactly at the limit is fine
    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&alice.token))
        .set_json(json!({ "title": "x".repeat(255) }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let stats = state.todos.stats(alice.id).await.unwrap();
    assert_eq!(stats.total, 1);
}

#[actix_rt::test]
async fn test_todos_are_private_to_their_owner() {
    let state = common::test_state();
    let app = init_app!(state);
    let alice = register_user(&app, "alice", "a@x.com", "Abc123").await;
    let bob = register_user(&app, "bob", "b@x.com", "Abc123").await;

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&alice.token))
        .set_json(json!({ "title": "alice only" }))
        .to_request();
    let (_, body) = send(&app, req).await;
    let id = body["todo"]["id"].as_i64().unwrap();
    let original: Value = body["todo"].clone();

    let attempts = [
        test::TestRequest::get().uri(&format!("/api/todos/{}", id)),
        test::TestRequest::put()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({ "title": "hijacked", "completed": true })),
        test::TestRequest::patch().uri(&format!("/api/todos/{}/toggle", id)),
        test::TestRequest::delete().uri(&format!("/api/todos/{}", id)),
    ];
    for attempt in attempts {
        let req = attempt.insert_header(bearer(&bob.token)).to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["error"],
            "Access denied - this todo does not belong to you"
        );
    }

    // Bob's view of the world does not include Alice's todo
    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&bob.token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body, json!({ "count": 0, "todos": [] }));

    let req = test::TestRequest::get()
        .uri("/api/todos/stats")
        .insert_header(bearer(&bob.token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(
        body,
        json!({ "statistics": { "total": 0, "completed": 0, "pending": 0 } })
    );

    // None of Bob's attempts changed anything
    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/{}", id))
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"], original);

    // A missing todo is reported as missing to everyone
    for token in [&alice.token, &bob.token] {
        let req = test::TestRequest::get()
            .uri("/api/todos/9999")
            .insert_header(bearer(token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[actix_rt::test]
async fn test_invalid_todo_ids() {
    let state = common::test_state();
    let app = init_app!(state);
    let alice = register_user(&app, "alice", "a@x.com", "Abc123").await;

    for uri in ["/api/todos/abc", "/api/todos/0", "/api/todos/-1", "/api/todos/1.5"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&alice.token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "ID must be a positive integer");
    }

    let req = test::TestRequest::patch()
        .uri("/api/todos/abc/toggle")
        .insert_header(bearer(&alice.token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_todo_routes_require_authentication() {
    let state = common::test_state();
    let app = init_app!(state);

    let requests = [
        test::TestRequest::get().uri("/api/todos"),
        test::TestRequest::get().uri("/api/todos/stats"),
        test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "anonymous" })),
        test::TestRequest::get().uri("/api/todos/1"),
        test::TestRequest::delete().uri("/api/todos/1"),
    ];
    for req in requests {
        let (status, body) = send(&app, req.to_request()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Access token required");
    }
}

#[actix_rt::test]
async fn test_missing_todo_is_not_found_on_every_route() {
    let state = common::test_state();
    let app = init_app!(state);
    let alice = register_user(&app, "alice", "a@x.com", "Abc123").await;

    let requests = [
        test::TestRequest::get().uri("/api/todos/9999"),
        test::TestRequest::put()
            .uri("/api/todos/9999")
            .set_json(json!({ "title": "x" })),
        test::TestRequest::put()
            .uri("/api/todos/9999")
            .set_json(json!({ "completed": true })),
        test::TestRequest::patch().uri("/api/todos/9999/toggle"),
        test::TestRequest::delete().uri("/api/todos/9999"),
    ];
    for req in requests {
        let req = req.insert_header(bearer(&alice.token)).to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Todo not found");
    }

    // An empty update is rejected before the todo is looked up
    let req = test::TestRequest::put()
        .uri("/api/todos/9999")
        .insert_header(bearer(&alice.token))
        .set_json(json!({}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "At least one field (title or completed) must be provided"
    );
}
