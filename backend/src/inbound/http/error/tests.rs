//! Tests for HTTP error rendering.

use super::*;
use actix_web::body::to_bytes;
use actix_web::http::header::HeaderMap;
use actix_web::{App, post, test as actix_test};
use rstest::{fixture, rstest};
use serde::Deserialize;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("title must not be empty"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(
    Error::forbidden("You are not authorized to access the Admin Dashboard."),
    StatusCode::FORBIDDEN
)]
#[case(Error::not_found("complaints/c9 not found"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("record was modified concurrently"), StatusCode::CONFLICT)]
#[case(
    Error::service_unavailable("document store unavailable: refused"),
    StatusCode::SERVICE_UNAVAILABLE
)]
#[case(Error::internal("complaints/abc is malformed"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_follows_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn rendered(error: &Error) -> (HeaderMap, Error) {
    let response = ResponseError::error_response(error);
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body()).await.expect("read error body");
    let payload = serde_json::from_slice(&bytes).expect("error body is JSON");
    (headers, payload)
}

#[rstest]
#[case(
    Error::internal("complaints/abc is malformed: missing field `title`"),
    INTERNAL_MESSAGE
)]
#[case(
    Error::service_unavailable("document store unavailable: connection refused"),
    UNAVAILABLE_MESSAGE
)]
#[case(
    Error::service_unavailable("auth provider unavailable: timeout"),
    UNAVAILABLE_MESSAGE
)]
#[actix_web::test]
async fn server_side_detail_is_replaced(
    trace_id: String,
    #[case] error: Error,
    #[case] shown: &str,
) {
    let error = error
        .with_trace_id(trace_id.clone())
        .with_details(json!({ "collection": "complaints" }));

    let (headers, payload) = rendered(&error).await;
    assert_eq!(payload.code(), error.code());
    assert_eq!(payload.message(), shown);
    assert_eq!(payload.trace_id(), Some(trace_id.as_str()));
    assert!(payload.details().is_none());
    assert_eq!(
        headers
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
}

#[rstest]
#[actix_web::test]
async fn outages_ask_clients_to_retry() {
    let (headers, _) = rendered(&Error::service_unavailable("down")).await;
    assert_eq!(
        headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok()),
        Some("5")
    );

    let (headers, _) = rendered(&Error::internal("boom")).await;
    assert!(headers.get(RETRY_AFTER).is_none());
}

#[rstest]
#[actix_web::test]
async fn stale_revision_details_reach_the_client(trace_id: String) {
    let error = Error::conflict("record was modified concurrently; reload and retry")
        .with_trace_id(trace_id)
        .with_details(json!({ "expectedRevision": 2, "actualRevision": 3 }));

    let (_, payload) = rendered(&error).await;
    assert_eq!(payload, error);
}

#[rstest]
#[actix_web::test]
async fn errors_raised_outside_a_request_carry_no_trace_header() {
    let error = Error::forbidden("You are not authorized to access the Student Dashboard.");

    let (headers, payload) = rendered(&error).await;
    assert!(headers.get(TRACE_ID_HEADER).is_none());
    assert_eq!(payload.trace_id(), None);
    assert_eq!(payload.message(), error.message());
}

#[derive(Debug, Deserialize)]
struct Echo {
    title: String,
}

#[post("/echo")]
async fn echo(payload: web::Json<Echo>) -> HttpResponse {
    HttpResponse::Ok().body(payload.into_inner().title)
}

#[rstest]
#[case("application/json", "{\"title\": 3}")]
#[case("application/json", "not json")]
#[case("text/plain", "{\"title\": \"x\"}")]
#[actix_web::test]
async fn unreadable_bodies_are_invalid_requests(#[case] content_type: &str, #[case] body: &str) {
    let app =
        actix_test::init_service(App::new().app_data(json_config()).service(echo)).await;
    let req = actix_test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", content_type))
        .set_payload(body.to_owned())
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Error = actix_test::read_body_json(res).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.details(), Some(&json!({ "code": "invalid_json" })));
}
