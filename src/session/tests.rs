use super::*;
use crate::request::HttpMethod;
use crate::request::mock::MockHttpClient;
use crate::storage::memory::MemoryTokenStorage;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://api.test";

type TestStore = SessionStore<Rc<MockHttpClient>, Rc<MemoryTokenStorage>>;

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn create_store(storage: MemoryTokenStorage) -> (Rc<MockHttpClient>, Rc<MemoryTokenStorage>, TestStore) {
    let client = Rc::new(MockHttpClient::new());
    let storage = Rc::new(storage);
    let store = SessionStore::new(BackendApi::new(client.clone(), BASE), storage.clone());
    (client, storage, store)
}

fn engineer_json() -> serde_json::Value {
    json!({
        "id": 7,
        "username": "eng7",
        "email": "eng@fahsna.sa",
        "first_name": "سالم",
        "last_name": "العتيبي",
        "user_type": "engineer",
        "is_verified": true
    })
}

fn mock_login_ok(client: &MockHttpClient) {
    client.mock_response(
        HttpMethod::Post,
        &url("/api/v1/users/login/"),
        200,
        json!({ "tokens": { "access": "acc-1", "refresh": "ref-1" } }),
    );
    client.mock_response(HttpMethod::Get, &url("/api/v1/users/profile/"), 200, engineer_json());
}

fn sample_form() -> RegistrationForm {
    RegistrationForm {
        email: "client@fahsna.sa".into(),
        password: "s3cret!".into(),
        password_confirm: "s3cret!".into(),
        first_name: "نورة".into(),
        last_name: "القحطاني".into(),
        user_type: Role::Client,
        phone: String::new(),
    }
}

// =========================================================
// login 测试
// =========================================================

#[tokio::test]
async fn test_login_success_persists_tokens_and_fetches_profile() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);

    assert!(store.login("eng@fahsna.sa", "pw").await);

    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-1"));
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));

    let session = store.snapshot();
    assert_eq!(session.token.as_deref(), Some("acc-1"));
    assert_eq!(session.role(), Some(Role::Engineer));
    assert!(!session.loading);

    // 资料请求必须携带新的访问令牌
    let profile_reqs = client.requests_to(HttpMethod::Get, &url("/api/v1/users/profile/"));
    assert_eq!(profile_reqs[0].headers.get("Authorization").unwrap(), "Bearer acc-1");
}

#[tokio::test]
async fn test_login_rejected_returns_false_and_stays_anonymous() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    client.mock_response(
        HttpMethod::Post,
        &url("/api/v1/users/login/"),
        400,
        json!({ "detail": "invalid credentials" }),
    );

    assert!(!store.login("eng@fahsna.sa", "wrong").await);
    assert!(storage.is_empty());
    assert_eq!(store.snapshot(), Session::anonymous());
}

#[tokio::test]
async fn test_login_network_failure_does_not_panic() {
    let (client, _storage, store) = create_store(MemoryTokenStorage::new());
    client.mock_network_error(HttpMethod::Post, &url("/api/v1/users/login/"));

    assert!(!store.login("eng@fahsna.sa", "pw").await);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_login_profile_failure_clears_everything() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    client.mock_response(
        HttpMethod::Post,
        &url("/api/v1/users/login/"),
        200,
        json!({ "tokens": { "access": "acc-1", "refresh": "ref-1" } }),
    );
    client.mock_response(HttpMethod::Get, &url("/api/v1/users/profile/"), 500, json!({}));

    assert!(!store.login("eng@fahsna.sa", "pw").await);
    assert!(storage.is_empty());
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn test_failed_login_keeps_prior_session() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);
    assert!(store.login("eng@fahsna.sa", "pw").await);

    client.mock_response(HttpMethod::Post, &url("/api/v1/users/login/"), 401, json!({}));
    assert!(!store.login("other@fahsna.sa", "bad").await);

    assert_eq!(store.access_token().as_deref(), Some("acc-1"));
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
}

// =========================================================
// logout 测试
// =========================================================

#[tokio::test]
async fn test_logout_clears_even_when_server_call_fails() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);
    assert!(store.login("eng@fahsna.sa", "pw").await);

    client.mock_network_error(HttpMethod::Post, &url("/api/v1/users/logout/"));
    store.logout().await;

    assert!(storage.is_empty());
    assert!(store.user().is_none());
    assert!(store.access_token().is_none());

    let reqs = client.requests_to(HttpMethod::Post, &url("/api/v1/users/logout/"));
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].headers.get("Authorization").unwrap(), "Bearer acc-1");
}

#[tokio::test]
async fn test_logout_without_refresh_token_skips_server_call() {
    let (client, _storage, store) = create_store(MemoryTokenStorage::new());
    store.logout().await;
    assert_eq!(client.request_count(), 0);
}

// =========================================================
// init 测试
// =========================================================

#[tokio::test]
async fn test_init_with_valid_token_populates_user() {
    let (client, _storage, store) = create_store(MemoryTokenStorage::with(&[
        (ACCESS_TOKEN_KEY, "persisted"),
        (REFRESH_TOKEN_KEY, "persisted-ref"),
    ]));
    client.mock_response(HttpMethod::Get, &url("/api/v1/users/profile/"), 200, engineer_json());

    assert!(store.snapshot().loading);
    let session = store.init().await;

    assert!(!session.loading);
    assert_eq!(session.token.as_deref(), Some("persisted"));
    assert_eq!(session.user.unwrap().id, 7);
}

#[tokio::test]
async fn test_init_with_rejected_token_clears_storage() {
    let (client, storage, store) = create_store(MemoryTokenStorage::with(&[
        (ACCESS_TOKEN_KEY, "stale"),
        (REFRESH_TOKEN_KEY, "stale-ref"),
    ]));
    client.mock_response(HttpMethod::Get, &url("/api/v1/users/profile/"), 401, json!({}));

    let session = store.init().await;

    assert_eq!(session, Session::anonymous());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_init_without_token_makes_no_request() {
    let (client, storage, store) =
        create_store(MemoryTokenStorage::with(&[(REFRESH_TOKEN_KEY, "orphan-ref")]));
    let session = store.init().await;
    assert_eq!(session, Session::anonymous());
    assert_eq!(client.request_count(), 0);
    // 没有访问令牌时残留的刷新令牌也要清除
    assert!(storage.get(REFRESH_TOKEN_KEY).is_none());
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
}

// =========================================================
// refresh 测试
// =========================================================

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);
    assert!(store.login("eng@fahsna.sa", "pw").await);

    client.mock_response(
        HttpMethod::Post,
        &url("/api/v1/users/token/refresh/"),
        200,
        json!({ "access": "acc-2", "refresh": "ref-2" }),
    );

    assert!(store.refresh().await);
    assert_eq!(store.access_token().as_deref(), Some("acc-2"));
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-2"));
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_refresh_failure_logs_out() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);
    assert!(store.login("eng@fahsna.sa", "pw").await);

    client.mock_response(HttpMethod::Post, &url("/api/v1/users/token/refresh/"), 401, json!({}));

    assert!(!store.refresh().await);
    assert!(storage.is_empty());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_recover_only_reacts_to_auth_errors() {
    let (client, _storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);
    assert!(store.login("eng@fahsna.sa", "pw").await);
    let before = client.request_count();

    assert!(!store.recover(&AppError::status(500, "oops")).await);
    assert_eq!(client.request_count(), before);
}

// =========================================================
// register 测试
// =========================================================

#[tokio::test]
async fn test_register_adopts_returned_user() {
    let (client, storage, store) = create_store(MemoryTokenStorage::new());
    client.mock_response(
        HttpMethod::Post,
        &url("/api/v1/users/register/"),
        201,
        json!({
            "tokens": { "access": "acc-new", "refresh": "ref-new" },
            "user": { "id": 11, "email": "client@fahsna.sa", "user_type": "client" }
        }),
    );

    assert!(store.register(&sample_form()).await);
    assert_eq!(store.snapshot().role(), Some(Role::Client));
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-new"));
    // 注册成功后不再请求资料
    assert!(client.requests_to(HttpMethod::Get, &url("/api/v1/users/profile/")).is_empty());

    let reqs = client.requests_to(HttpMethod::Post, &url("/api/v1/users/register/"));
    match &reqs[0].body {
        Some(crate::request::HttpBody::Json(body)) => {
            let v: serde_json::Value = serde_json::from_str(body).unwrap();
            assert_eq!(v["user_type"], "client");
            assert!(v.get("phone").is_none());
            assert!(v.get("password_confirm").is_none());
        }
        other => panic!("expected json body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_password_mismatch_sends_nothing() {
    let (client, _storage, store) = create_store(MemoryTokenStorage::new());
    let form = RegistrationForm {
        password_confirm: "different".into(),
        ..sample_form()
    };

    assert!(!store.register(&form).await);
    assert_eq!(client.request_count(), 0);
}

#[test]
fn test_registration_requires_fields() {
    let form = RegistrationForm {
        first_name: "  ".into(),
        ..sample_form()
    };
    assert!(form.validate().is_err());

    let req = RegistrationForm {
        phone: " 0500000000 ".into(),
        ..sample_form()
    }
    .validate()
    .unwrap();
    assert_eq!(req.phone.as_deref(), Some("0500000000"));
}

// =========================================================
// 观察者测试
// =========================================================

#[tokio::test]
async fn test_observers_see_every_replacement_until_teardown() {
    let (client, _storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);

    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    store.subscribe(move |_| seen.set(seen.get() + 1));

    store.init().await;
    assert!(store.login("eng@fahsna.sa", "pw").await);
    assert_eq!(calls.get(), 2);

    store.teardown();
    store.logout().await;
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_update_user_replaces_profile_only() {
    let (client, _storage, store) = create_store(MemoryTokenStorage::new());
    mock_login_ok(&client);
    assert!(store.login("eng@fahsna.sa", "pw").await);

    let mut user = store.user().unwrap();
    user.phone = Some("0555555555".into());
    store.update_user(user);

    assert_eq!(store.user().unwrap().phone.as_deref(), Some("0555555555"));
    assert_eq!(store.access_token().as_deref(), Some("acc-1"));
}
