use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{TestRequest, call_service, read_body_json};
use serde_json::{Value, json};

use crate::entities::v1::users;
use crate::testing::setup;

const ME_URL: &str = "/user/me/";

#[actix_web::test]
async fn update_profile_name_and_password() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "test@mail.com", "testpass")
        .await
        .unwrap();
    let token = setup::token(&db, &user).await;

    let request = TestRequest::patch()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "name": "new name", "password": "newpassword123" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;

    assert_eq!(body, json!({ "email": "test@mail.com", "name": "new name" }));

    let updated = users::Model::find_by_id(&db, user.id).await.unwrap().unwrap();

    assert_eq!(updated.name, "new name");
    assert!(hasher.verify("newpassword123", &updated.password).unwrap());
    assert!(updated.updated_at >= user.updated_at);
}

#[actix_web::test]
async fn update_is_visible_to_cached_session() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "cached@mail.com", "testpass")
        .await
        .unwrap();
    let token = setup::token(&db, &user).await;
    let bearer = format!("Bearer {}", token);

    // first read populates the session cache
    let request = TestRequest::get()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, bearer.clone()))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);

    let request = TestRequest::patch()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, bearer.clone()))
        .set_json(json!({ "name": "renamed" }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);

    let request = TestRequest::get()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, bearer))
        .to_request();
    let response = call_service(&service, request).await;
    let body: Value = read_body_json(response).await;

    assert_eq!(body["name"], "renamed");
}

#[actix_web::test]
async fn short_password_is_rejected() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "short@mail.com", "testpass")
        .await
        .unwrap();
    let token = setup::token(&db, &user).await;

    let request = TestRequest::patch()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "name": "ignored", "password": "pw" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = read_body_json(response).await;

    assert!(body["errors"]["password"].is_array());

    let unchanged = users::Model::find_by_id(&db, user.id).await.unwrap().unwrap();

    assert_eq!(unchanged.name, "Test User");
    assert!(hasher.verify("testpass", &unchanged.password).unwrap());
}

#[actix_web::test]
async fn empty_patch_keeps_profile() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "empty@mail.com", "testpass")
        .await
        .unwrap();
    let token = setup::token(&db, &user).await;

    let request = TestRequest::patch()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({}))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;

    assert_eq!(body, json!({ "email": "empty@mail.com", "name": "Test User" }));
}

#[actix_web::test]
async fn password_change_keeps_token() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "keep@mail.com", "testpass")
        .await
        .unwrap();
    let token = setup::token(&db, &user).await;
    let bearer = format!("Bearer {}", token);

    let request = TestRequest::patch()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, bearer.clone()))
        .set_json(json!({ "password": "another-secret" }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);

    let request = TestRequest::get()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, bearer))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn unauthenticated_patch_is_rejected() {
    let (service, _db) = crate::service!();

    let request = TestRequest::patch()
        .uri(ME_URL)
        .set_json(json!({ "name": "nobody" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn form_encoded_patch_is_accepted() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "form@mail.com", "testpass")
        .await
        .unwrap();
    let token = setup::token(&db, &user).await;

    let request = TestRequest::patch()
        .uri(ME_URL)
        .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
        .set_form([("name", "from form")])
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let updated = users::Model::find_by_id(&db, user.id).await.unwrap().unwrap();

    assert_eq!(updated.name, "from form");
}
