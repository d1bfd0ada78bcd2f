//! End-to-end session flows through the public HTTP surface.
//!
//! Each scenario wires the same middleware stack as the server binary (trace
//! identifiers outside, cookie sessions around `/api/v1`) and walks a client
//! through login, shell resolution and logout.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, body::BoxBody, test, web};
use camino::Utf8PathBuf;
use hannah_backend::Trace;
use hannah_backend::domain::ports::{FixtureAccountRegistry, SharedKeyValueStore};
use hannah_backend::domain::{SessionStoreSettings, TRACE_ID_HEADER};
use hannah_backend::inbound::http::auth::{
    current_session, login, logout, password_reset, register,
};
use hannah_backend::inbound::http::error::configure_extractors;
use hannah_backend::inbound::http::shell::resolve_shell;
use hannah_backend::inbound::http::state::HttpState;
use hannah_backend::outbound::storage::{InMemoryKeyValueStore, JsonFileKeyValueStore};
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

async fn init_app(
    students: SharedKeyValueStore,
    key: Key,
) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
{
    let state = HttpState::new(
        Arc::new(FixtureAccountRegistry),
        students,
        SessionStoreSettings::immediate(),
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .configure(configure_extractors)
                    .service(login)
                    .service(register)
                    .service(password_reset)
                    .service(logout)
                    .service(current_session)
                    .service(resolve_shell),
            ),
    )
    .await
}

fn cookie_from(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

fn get(uri: &str, cookie: &Cookie<'static>) -> actix_http::Request {
    test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request()
}

#[rstest]
#[case("admin@hannah.ai", "staff", "admin", "users")]
#[case("faculty@hannah.ai", "staff", "faculty", "dashboard")]
#[case("student@hannah.ai", "student", "student", "chat")]
#[actix_web::test]
async fn fixed_accounts_land_in_their_role_shell(
    #[case] email: &str,
    #[case] view: &str,
    #[case] role: &str,
    #[case] section: &str,
) {
    let app = init_app(Arc::new(InMemoryKeyValueStore::new()), Key::generate()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": "123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let cookie = cookie_from(&res);

    let shell: Value = test::call_and_read_body_json(&app, get("/api/v1/shell", &cookie)).await;
    assert_eq!(shell["view"], view);
    assert_eq!(shell["role"], role);
    assert_eq!(shell["activeSection"], section);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = cookie_from(&res);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "redirectTo": "/" }));

    let shell: Value = test::call_and_read_body_json(&app, get("/api/v1/shell", &cleared)).await;
    assert_eq!(shell, json!({ "view": "entry" }));
}

#[actix_web::test]
async fn rejected_login_carries_trace_id() {
    let app = init_app(Arc::new(InMemoryKeyValueStore::new()), Key::generate()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "admin@hannah.ai", "password": "wrongpassword" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"], header);
}

#[actix_web::test]
async fn registered_students_survive_restart_with_file_storage() {
    let tmp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().join("students")).expect("utf8 path");

    let first = init_app(
        Arc::new(JsonFileKeyValueStore::open(&root).expect("open store")),
        Key::generate(),
    )
    .await;
    let res = test::call_service(
        &first,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "name": "Ada", "email": "ada@x.com", "password": "123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = cookie_from(&res);
    let shell: Value = test::call_and_read_body_json(&first, get("/api/v1/shell", &cookie)).await;
    assert_eq!(shell["view"], "student");

    let second = init_app(
        Arc::new(JsonFileKeyValueStore::open(&root).expect("reopen store")),
        Key::generate(),
    )
    .await;
    let reset: Value = test::call_and_read_body_json(
        &second,
        test::TestRequest::post()
            .uri("/api/v1/auth/password-reset")
            .set_json(json!({ "email": "ada@x.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(reset, json!({ "accepted": true }));

    let duplicate = test::call_service(
        &second,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "name": "Ada", "email": "ada@x.com", "password": "123456" }))
            .to_request(),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}
