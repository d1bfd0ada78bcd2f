//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error_case() -> Error {
    Error::internal("failed to write hannah_user: disk full")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"key": "hannah_user"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn read_error(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace header is ascii").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let payload = serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds");
    (status, header, payload)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(internal_error_case: Error) {
    let (status, header, payload) = read_error(&internal_error_case).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[actix_web::test]
async fn client_errors_pass_through_with_details() {
    let error = Error::conflict("an account with this email already exists")
        .with_details(json!({"field": "email"}));

    let (status, header, payload) = read_error(&error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(header.is_none());
    assert_eq!(payload.message(), "an account with this email already exists");
    assert_eq!(payload.details(), Some(&json!({"field": "email"})));
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

mod extractors {
    //! Malformed bodies and queries share the error envelope.
    use super::*;
    use crate::domain::Viewport;
    use actix_web::{App, test, web};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        email: String,
    }

    #[derive(Deserialize)]
    struct Query {
        viewport: Viewport,
    }

    async fn rejection_for(req: test::TestRequest) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .configure(configure_extractors)
                .route(
                    "/body",
                    web::post().to(|body: web::Json<Body>| async move {
                        HttpResponse::Ok().body(body.into_inner().email)
                    }),
                )
                .route(
                    "/query",
                    web::get().to(|query: web::Query<Query>| async move {
                        HttpResponse::Ok().json(query.into_inner().viewport)
                    }),
                ),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn malformed_json_is_an_invalid_request() {
        let (status, body) = rejection_for(
            test::TestRequest::post()
                .uri("/body")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["code"], "malformed_body");
    }

    #[actix_web::test]
    async fn unknown_viewport_is_an_invalid_request() {
        let (status, body) =
            rejection_for(test::TestRequest::get().uri("/query?viewport=tablet")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "malformed_query");
    }
}
