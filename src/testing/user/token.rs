use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service, read_body_json};
use chrono::TimeDelta;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::{Value, json};

use crate::config::{Argon2Config, AuthConfig};
use crate::entities::v1::{tokens, users};
use crate::helpers::now;
use crate::models::v1::token::KEY_LENGTH;
use crate::security::PasswordHasher;
use crate::services::v1::auth::token::INVALID_CREDENTIALS;
use crate::testing::setup;

const TOKEN_URL: &str = "/user/token/";

#[actix_web::test]
async fn create_token_for_user() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "test@mail.com", "testpass")
        .await
        .unwrap();

    let request = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "test@mail.com", "password": "testpass" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    let token = body["token"].as_str().unwrap();

    assert_eq!(token.len(), KEY_LENGTH);
    assert!(tokens::Entity::find_by_id(token.to_string()).one(&db).await.unwrap().is_some());
}

#[actix_web::test]
async fn repeated_requests_reuse_token() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "reuse@mail.com", "testpass")
        .await
        .unwrap();

    let mut issued = Vec::new();

    for _ in 0..2 {
        let request = TestRequest::post()
            .uri(TOKEN_URL)
            .set_json(json!({ "email": "REUSE@mail.com", "password": "testpass" }))
            .to_request();
        let response = call_service(&service, request).await;

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = read_body_json(response).await;
        issued.push(body["token"].as_str().unwrap().to_string());
    }

    assert_eq!(issued[0], issued[1]);
    assert_eq!(tokens::Entity::find().count(&db).await.unwrap(), 1);
}

#[actix_web::test]
async fn expired_token_is_replaced() {
    let config = AuthConfig {
        token_expiration: Some(3600),
        ..setup::auth_config()
    };
    let (service, db) = crate::service!(config);
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "expired@mail.com", "testpass")
        .await
        .unwrap();

    let stale = tokens::Model::get_or_create(&db, user.id, TimeDelta::try_hours(1))
        .await
        .unwrap();
    let mut model = tokens::ActiveModel::from(stale.clone());
    model.expired_at = Set(Some(now() - TimeDelta::seconds(1)));
    model.update(&db).await.unwrap();

    let request = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "expired@mail.com", "password": "testpass" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    let token = body["token"].as_str().unwrap();

    assert_ne!(token, stale.key);

    let fresh = tokens::Model::find_by_user(&db, user.id).await.unwrap().unwrap();

    assert_eq!(fresh.key, token);
    assert!(fresh.expired_at.is_some_and(|at| at > now()));
}

#[actix_web::test]
async fn wrong_password_is_rejected() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "test@mail.com", "testpass")
        .await
        .unwrap();

    let request = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "test@mail.com", "password": "wrong" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = read_body_json(response).await;

    assert!(body.get("token").is_none());
    assert_eq!(body["errors"]["credentials"][0], INVALID_CREDENTIALS);
    assert_eq!(tokens::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn inactive_user_is_rejected() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let user = setup::create_user(&db, &hasher, "inactive@mail.com", "testpass")
        .await
        .unwrap();

    let mut model = users::ActiveModel::from(user);
    model.is_active = Set(false);
    model.update(&db).await.unwrap();

    let request = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "inactive@mail.com", "password": "testpass" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = read_body_json(response).await;

    assert!(body.get("token").is_none());
    assert_eq!(body["errors"]["credentials"][0], INVALID_CREDENTIALS);
}

#[actix_web::test]
async fn outdated_hash_is_upgraded_on_login() {
    let (service, db) = crate::service!();
    let legacy = PasswordHasher::from_config(&AuthConfig {
        argon2: Argon2Config {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
        },
        ..AuthConfig::default()
    })
    .unwrap();
    let current = setup::password_hasher();

    let user = setup::create_user(&db, &legacy, "legacy@mail.com", "testpass")
        .await
        .unwrap();

    assert!(current.needs_rehash(&user.password).unwrap());

    let request = TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({ "email": "legacy@mail.com", "password": "testpass" }))
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let user = users::Model::find_by_id(&db, user.id).await.unwrap().unwrap();

    assert!(!current.needs_rehash(&user.password).unwrap());
    assert!(current.verify("testpass", &user.password).unwrap());
}

#[actix_web::test]
async fn form_encoded_credentials_are_accepted() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();

    setup::create_user(&db, &hasher, "form@mail.com", "testpass")
        .await
        .unwrap();

    let request = TestRequest::post()
        .uri(TOKEN_URL)
        .set_form([("email", "form@mail.com"), ("password", "testpass")])
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;

    assert_eq!(body["token"].as_str().unwrap().len(), KEY_LENGTH);
}
