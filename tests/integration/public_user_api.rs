//! Registration and token issuance, no authentication involved

use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service, read_body_json};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

use account_api::entities::v1::users;
use account_api::testing::setup;

const CREATE_USER_URL: &str = "/user/create/";
const TOKEN_URL: &str = "/user/token/";

#[actix_web::test]
async fn test_create_valid_user_success() {
    let (service, db) = account_api::service!();
    let payload = json!({
        "email": "myemail@mail.com",
        "password": "test123",
        "name": "Test name",
    });

    let req = TestRequest::post()
        .uri(CREATE_USER_URL)
        .set_json(&payload)
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = read_body_json(resp).await;

    assert!(body.get("password").is_none(), "password must never be returned");
    assert_eq!(body["email"], "myemail@mail.com");

    let user = users::Model::find_by_email(&db, "myemail@mail.com")
        .await
        .unwrap()
        .expect("user should be persisted");

    assert!(setup::password_hasher().verify("test123", &user.password).unwrap());
}

#[actix_web::test]
async fn test_user_exists() {
    let (service, db) = account_api::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "myemail@mail.com", "test123")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri(CREATE_USER_URL)
        .set_json(json!({ "email": "myemail@mail.com", "password": "test123" }))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_password_too_short() {
    let (service, db) = account_api::service!();

    let req = TestRequest::post()
        .uri(CREATE_USER_URL)
        .set_json(json!({ "email": "myemail@mail.com", "password": "pw" }))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
        !users::Model::email_exists(&db, "myemail@mail.com")
            .await
            .unwrap()
    );
}

#[actix_web::test]
async fn test_create_token_for_user() {
    let (service, db) = account_api::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "test@mail.com", "testpass")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "test@mail.com", "password": "testpass" }))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = read_body_json(resp).await;

    assert!(body["token"].is_string());
}

#[actix_web::test]
async fn test_create_token_invalid_credentials() {
    let (service, db) = account_api::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "test@mail.com", "testpass")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "test@mail.com", "password": "wrong" }))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = read_body_json(resp).await;

    assert!(body.get("token").is_none());
}

#[actix_web::test]
async fn test_create_token_no_user() {
    let (service, _db) = account_api::service!();

    let req = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "test@mail.com", "password": "testpass" }))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = read_body_json(resp).await;

    assert!(body.get("token").is_none());
}

#[actix_web::test]
async fn test_create_token_missing_field() {
    let (service, db) = account_api::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "test@mail.com", "testpass")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "test@mail.com", "password": "" }))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = read_body_json(resp).await;

    assert!(body.get("token").is_none());
    assert!(body["errors"]["password"].is_array());
}

#[actix_web::test]
async fn test_registered_user_can_obtain_token() {
    let (service, _db) = account_api::service!();

    let req = TestRequest::post()
        .uri(CREATE_USER_URL)
        .set_json(json!({ "email": "flow@mail.com", "password": "test123", "name": "Flow" }))
        .to_request();
    assert_eq!(call_service(&service, req).await.status(), StatusCode::CREATED);

    let req = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "flow@mail.com", "password": "test123" }))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_form_encoded_registration_and_login() {
    let (service, _db) = account_api::service!();

    let req = TestRequest::post()
        .uri(CREATE_USER_URL)
        .set_form([
            ("email", "form@mail.com"),
            ("password", "test123"),
            ("name", "stark"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = TestRequest::post()
        .uri(TOKEN_URL)
        .set_form([("email", "form@mail.com"), ("password", "test123")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = read_body_json(resp).await;

    assert!(body["token"].is_string());
}
