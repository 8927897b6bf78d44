/// Integration tests for the Budgetboard API
///
/// These drive the full router end-to-end:
/// - authentication (register, login, refresh, Bearer layer)
/// - category and record CRUD with board-scoped access
/// - query string parsing and error bodies

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "connected");
    assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
}

#[tokio::test]
async fn test_register_login_refresh_me() {
    let ctx = TestContext::new();

    let registered = ctx
        .send(
            Method::POST,
            "/v1/auth/register",
            None,
            Some(json!({ "username": "john_doe", "password": "Sup3r$ecret" })),
        )
        .await;
    assert_eq!(registered.status, StatusCode::OK, "{}", registered.body);
    assert_eq!(registered.body["user"]["username"], "john_doe");
    assert!(registered.body["user"].get("passwordHash").is_none());

    let login = ctx
        .send(
            Method::POST,
            "/v1/auth/login",
            None,
            Some(json!({ "username": "john_doe", "password": "Sup3r$ecret" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let access = login.body["accessToken"].as_str().unwrap().to_string();
    let refresh = login.body["refreshToken"].as_str().unwrap().to_string();

    let refreshed = ctx
        .send(
            Method::POST,
            "/v1/auth/refresh",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.body["accessToken"].is_string());

    // A refresh token is not an access token
    let misuse = ctx.get("/v1/auth/me", &refresh).await;
    assert_eq!(misuse.status, StatusCode::UNAUTHORIZED);

    let board_id = ctx.board(&access, "clever-budgetiers").await;
    let me = ctx.get("/v1/auth/me", &access).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "john_doe");
    assert_eq!(me.body["administratedBoards"], json!([board_id]));
    assert_eq!(me.body["boards"], json!([board_id]));
}

#[tokio::test]
async fn test_register_validation_and_login_failures() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            Method::POST,
            "/v1/auth/register",
            None,
            Some(json!({ "username": "jd" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "fields": {
                "password": "Required field.",
                "username": "Should be between 3 and 50 characters."
            }
        })
    );

    let response = ctx
        .send(Method::POST, "/v1/auth/login", None, Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "fields": { "password": "Required field.", "username": "Required field." } })
    );

    let response = ctx
        .send(
            Method::POST,
            "/v1/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "Sup3r$ecret" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid username or password.");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let ctx = TestContext::new();

    let response = ctx
        .send(Method::GET, "/v1/finance/categories/search", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "message": "Missing credentials." }));

    let response = ctx
        .send(Method::GET, "/v1/currencies", Some("not-a-jwt"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Token for a user that does not exist
    let token = budgetboard_shared::auth::jwt::create_token(
        &budgetboard_shared::auth::jwt::Claims::new(
            4242,
            budgetboard_shared::auth::jwt::TokenType::Access,
        ),
        common::SECRET,
    )
    .unwrap();
    let response = ctx.get("/v1/currencies", &token).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Unknown user.");
}

#[tokio::test]
async fn test_reference_data() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("john_doe").await;

    let types = ctx.get("/v1/category-types", &token).await;
    assert_eq!(
        types.body,
        json!([{ "id": 1, "name": "expense" }, { "id": 2, "name": "income" }])
    );

    let currencies = ctx.get("/v1/currencies", &token).await;
    assert_eq!(currencies.status, StatusCode::OK);
    assert_eq!(currencies.body.as_array().unwrap().len(), 3);

    let subjects = ctx.get("/v1/group-subjects", &token).await;
    assert_eq!(subjects.body[2]["name"], "activity");
}

#[tokio::test]
async fn test_category_create_and_find() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("john_doe").await;
    let board_id = ctx.board(&token, "clever-budgetiers").await;

    let created = ctx
        .post(
            "/v1/finance/categories",
            &token,
            json!({ "name": "Food", "boardId": board_id, "typeId": 1 }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);
    let id = created.body["id"].as_i64().unwrap();

    let found = ctx.get(&format!("/v1/finance/categories/{}", id), &token).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body, created.body);
    assert_eq!(found.body["family"], "finance");
    assert_eq!(found.body["board"], json!({ "id": board_id, "name": "clever-budgetiers" }));
    assert_eq!(found.body["type"], json!({ "id": 1, "name": "expense" }));

    // Same id, other family
    let other = ctx.get(&format!("/v1/budget/categories/{}", id), &token).await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);
    assert_eq!(other.body, json!({ "message": "Not found." }));

    let missing = ctx
        .post("/v1/activity/categories", &token, json!({ "name": "Running" }))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.body,
        json!({ "fields": { "boardId": "Required field.", "unit": "Required field." } })
    );
}

#[tokio::test]
async fn test_outsider_cannot_delete_category() {
    let ctx = TestContext::new();
    let (_, john) = ctx.user("john_doe").await;
    let (_, jessica) = ctx.user("jessica_stark").await;
    let board_id = ctx.board(&john, "clever-budgetiers").await;

    let created = ctx
        .post(
            "/v1/activity/categories",
            &john,
            json!({ "name": "Running", "boardId": board_id, "unit": "km" }),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/v1/activity/categories/{}", id);

    let denied = ctx.delete(&uri, &jessica).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.body, json!({ "message": "Access denied." }));

    let denied = ctx.get(&uri, &jessica).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let search = ctx.get("/v1/activity/categories/search", &john).await;
    assert_eq!(search.status, StatusCode::OK);
    assert_eq!(search.body.as_array().unwrap().len(), 1);
    assert_eq!(search.body[0]["id"], id);

    let duplicate = ctx
        .post(
            "/v1/activity/categories",
            &john,
            json!({ "name": "Running", "boardId": board_id, "unit": "km" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    let message = "\"Running\" category already exists in this board.";
    assert_eq!(
        duplicate.body,
        json!({ "fields": { "boardId": message, "name": message, "unit": message } })
    );

    let deleted = ctx.delete(&uri, &john).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["name"], "Running");
}

#[tokio::test]
async fn test_record_validation_errors() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("john_doe").await;
    let board_id = ctx.board(&token, "clever-budgetiers").await;
    let category = ctx
        .post(
            "/v1/finance/categories",
            &token,
            json!({ "name": "Food", "boardId": board_id, "typeId": 1 }),
        )
        .await;
    let category_id = category.body["id"].as_i64().unwrap();

    let response = ctx
        .post(
            "/v1/finance/records",
            &token,
            json!({ "amount": -20.5, "categoryId": category_id, "date": "2022|08|05" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "fields": {
                "amount": "Should be positive.",
                "date": "Should have format YYYY-MM-DD."
            }
        })
    );

    let response = ctx
        .post(
            "/v1/finance/records",
            &token,
            json!({ "amount": "abc", "categoryId": category_id, "date": "2022|08|05" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "fields": {
                "amount": "Should be positive.",
                "date": "Should have format YYYY-MM-DD."
            }
        })
    );
}

#[tokio::test]
async fn test_field_types_and_lengths() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("john_doe").await;

    let response = ctx
        .post("/v1/boards", &token, json!({ "name": "b".repeat(300) }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "fields": { "name": "Should be at most 100 characters." } })
    );

    let response = ctx.post("/v1/boards", &token, json!({ "name": 42 })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "fields": { "name": "Should be a string." } }));

    let board_id = ctx.board(&token, "clever-budgetiers").await;
    let response = ctx
        .post(
            "/v1/activity/categories",
            &token,
            json!({ "name": "Running", "boardId": board_id, "unit": "k".repeat(51) }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "fields": { "unit": "Should be at most 50 characters." } })
    );

    let response = ctx
        .post(
            "/v1/activity/categories",
            &token,
            json!({ "name": "Running", "boardId": "first", "unit": "km" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "fields": { "boardId": "Invalid value." } }));
}

#[tokio::test]
async fn test_record_search_ordering_and_trash() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("john_doe").await;
    let board_id = ctx.board(&token, "clever-budgetiers").await;
    let category = ctx
        .post(
            "/v1/budget/categories",
            &token,
            json!({ "name": "Rent", "boardId": board_id, "typeId": 1 }),
        )
        .await;
    let category_id = category.body["id"].as_i64().unwrap();

    let mut ids = Vec::new();
    for (amount, date) in [(800.0, "2022-03-01"), (750.0, "2022-01-01"), (775.0, "2022-02-01")] {
        let created = ctx
            .post(
                "/v1/budget/records",
                &token,
                json!({
                    "amount": amount,
                    "categoryId": category_id,
                    "date": date,
                    "currencySlug": "eur"
                }),
            )
            .await;
        assert_eq!(created.status, StatusCode::OK, "{}", created.body);
        assert_eq!(created.body["currency"]["slug"], "eur");
        ids.push(created.body["id"].as_i64().unwrap());
    }

    let ids_of = |body: &serde_json::Value| -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect()
    };

    let newest = ctx.get("/v1/budget/records/search", &token).await;
    assert_eq!(ids_of(&newest.body), vec![ids[2], ids[1], ids[0]]);

    let page = ctx
        .get(
            "/v1/budget/records/search?orderingByDate=asc&skip=1&take=2",
            &token,
        )
        .await;
    assert_eq!(ids_of(&page.body), vec![ids[2], ids[0]]);

    let trashed = ctx
        .patch(
            &format!("/v1/budget/records/{}", ids[1]),
            &token,
            json!({ "isTrashed": true }),
        )
        .await;
    assert_eq!(trashed.status, StatusCode::OK);
    assert_eq!(trashed.body["isTrashed"], true);

    let live = ctx
        .get("/v1/budget/records/search?isTrashed=false", &token)
        .await;
    assert_eq!(ids_of(&live.body), vec![ids[2], ids[0]]);

    let by_date = ctx
        .get("/v1/budget/records/search?date=2022-02-01,2022-03-01&amount=800", &token)
        .await;
    assert_eq!(ids_of(&by_date.body), vec![ids[0]]);

    let bad = ctx
        .get(
            "/v1/budget/records/search?isTrashed=maybe&orderingById=sideways&skip=-3",
            &token,
        )
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad.body,
        json!({
            "fields": {
                "isTrashed": "Should be a boolean.",
                "orderingById": "Should be ASC or DESC.",
                "skip": "Should be a non-negative integer."
            }
        })
    );
}

#[tokio::test]
async fn test_membership_grants_access() {
    let ctx = TestContext::new();
    let (_, john) = ctx.user("john_doe").await;
    let (jessica_id, jessica) = ctx.user("jessica_stark").await;
    let board_id = ctx.board(&john, "clever-budgetiers").await;
    let category = ctx
        .post(
            "/v1/finance/categories",
            &john,
            json!({ "name": "Food", "boardId": board_id, "typeId": 1 }),
        )
        .await;
    let uri = format!("/v1/finance/categories/{}", category.body["id"]);

    assert_eq!(ctx.get(&uri, &jessica).await.status, StatusCode::FORBIDDEN);

    // Only administrators invite
    let denied = ctx
        .post(
            &format!("/v1/boards/{}/members", board_id),
            &jessica,
            json!({ "userId": jessica_id }),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let board = ctx
        .post(
            &format!("/v1/boards/{}/members", board_id),
            &john,
            json!({ "userId": jessica_id }),
        )
        .await;
    assert_eq!(board.status, StatusCode::OK);
    assert_eq!(board.body["members"].as_array().unwrap().len(), 2);

    // Roles are read per request, so the new membership applies at once
    assert_eq!(ctx.get(&uri, &jessica).await.status, StatusCode::OK);

    let left = ctx
        .delete(
            &format!("/v1/boards/{}/members/{}", board_id, jessica_id),
            &jessica,
        )
        .await;
    assert_eq!(left.status, StatusCode::OK);
    assert_eq!(ctx.get(&uri, &jessica).await.status, StatusCode::FORBIDDEN);

    let search = ctx
        .get("/v1/boards/search?isMember=false", &jessica)
        .await;
    assert_eq!(search.body[0]["name"], "clever-budgetiers");
}

#[tokio::test]
async fn test_groups_over_http() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("john_doe").await;

    let created = ctx
        .post("/v1/groups", &token, json!({ "name": "Home", "subjectId": 1 }))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["subject"], json!({ "id": 1, "name": "finance" }));

    let duplicate = ctx
        .post("/v1/groups", &token, json!({ "name": "Home", "subjectId": 1 }))
        .await;
    assert_eq!(
        duplicate.body,
        json!({ "fields": { "name": "\"Home\" group already exists in this subject." } })
    );

    let search = ctx.get("/v1/groups/search?subjectId=1", &token).await;
    assert_eq!(search.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_users_lookup() {
    let ctx = TestContext::new();
    let (john_id, token) = ctx.user("john_doe").await;
    ctx.user("jessica_stark").await;

    let by_name = ctx.get("/v1/users/john_doe", &token).await;
    assert_eq!(by_name.body["id"], john_id);

    let by_id = ctx.get(&format!("/v1/users/{}", john_id), &token).await;
    assert_eq!(by_id.body["username"], "john_doe");

    let search = ctx
        .get("/v1/users/search?username=jessica_stark,john_doe", &token)
        .await;
    assert_eq!(search.body.as_array().unwrap().len(), 2);

    let missing = ctx.get("/v1/users/nobody", &token).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("john_doe").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/boards")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = ctx.send_request(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["message"].is_string());

    let response = ctx.get("/v1/finance/categories/abc", &token).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["message"].is_string());

    let response = ctx.get("/v1/savings/categories/search", &token).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
