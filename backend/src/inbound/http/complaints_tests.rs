//! Tests for complaint handlers.

use std::sync::Arc;

use super::*;
use crate::domain::{Category, ComplaintService, Email, RecordRepository, UserId};
use crate::inbound::http::test_utils::{
    CapturedLogs, MockPorts, TEST_USER_ID, sign_in_as, test_session_middleware,
    test_sign_in_routes,
};
use crate::outbound::memory::InMemoryDocumentStore;
use crate::test_support::FixtureClock;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::TimeZone;
use rstest::rstest;
use serde_json::{Value, json};

fn complaint(id: &str, status: Status) -> Complaint {
    Complaint::new(
        RecordId::new(id).expect("id"),
        UserId::new(TEST_USER_ID).expect("owner"),
        ComplaintDraft {
            title: "Projector broken".into(),
            description: "Room 204 projector will not power on".into(),
            category: Category::new("Facilities").expect("category"),
            priority: Priority::High,
        },
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
    )
    .with_status(status)
}

fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
        .single()
        .expect("timestamp")
}

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(test_session_middleware())
        .configure(test_sign_in_routes)
        .service(
            web::scope("/api/v1")
                .service(submit_complaint)
                .service(list_my_complaints)
                .service(list_complaints)
                .service(set_status)
                .service(toggle_status)
                .service(add_feedback)
                .service(remove_feedback),
        )
}

fn valid_form() -> Value {
    json!({
        "title": "Projector broken",
        "description": "Room 204 projector will not power on",
        "category": "Facilities",
        "priority": "high",
        "agreement": true
    })
}

#[actix_web::test]
async fn student_submits_complaint() {
    let mut ports = MockPorts::default();
    ports
        .complaints
        .expect_submit()
        .withf(|owner, draft| {
            owner.as_ref() == TEST_USER_ID
                && draft.priority == Priority::High
                && draft.category.as_ref() == "Facilities"
        })
        .times(1)
        .returning(|_, _| Ok(RecordId::new("c1").expect("id")));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in_as(&app, Admission::Student).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/complaints")
        .cookie(cookie)
        .set_json(valid_form())
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: CreatedResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.id, "c1");
}

#[actix_web::test]
async fn each_submission_is_logged_once() {
    let (logs, _guard) = CapturedLogs::install();
    let mut state = MockPorts::default().into_state();
    state.complaints = Arc::new(ComplaintService::new(
        RecordRepository::new(Arc::new(InMemoryDocumentStore::new())),
        Arc::new(FixtureClock::default()),
    ));
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .configure(test_sign_in_routes)
            .service(web::scope("/api/v1").service(submit_complaint)),
    )
    .await;
    let cookie = sign_in_as(&app, Admission::Student).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/complaints")
        .cookie(cookie)
        .set_json(valid_form())
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(logs.count("complaint submitted"), 1);
}

#[rstest]
#[case("title", json!(""), "missing_field")]
#[case("agreement", json!(false), "agreement_required")]
#[case("priority", json!("urgent"), "unknown_priority")]
#[actix_web::test]
async fn invalid_forms_are_rejected_before_any_write(
    #[case] field: &str,
    #[case] value: Value,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = sign_in_as(&app, Admission::Student).await;
    let mut form = valid_form();
    form[field] = value;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/complaints")
        .cookie(cookie)
        .set_json(form)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn admin_cannot_submit_complaints() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/complaints")
        .cookie(cookie)
        .set_json(valid_form())
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn student_lists_own_complaints_with_stats() {
    let mut ports = MockPorts::default();
    ports
        .complaints_query
        .expect_list_mine()
        .withf(|owner| owner.as_ref() == TEST_USER_ID)
        .returning(|_| {
            let complaints = vec![
                complaint("c1", Status::Unresolved),
                complaint("c2", Status::Resolved),
            ];
            let stats = ComplaintStats::tally(&complaints);
            Ok(ComplaintListing { complaints, stats })
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in_as(&app, Admission::Student).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/complaints/mine")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["stats"], json!({ "total": 2, "resolved": 1, "unresolved": 1 }));
    assert_eq!(body["complaints"][0]["status"], "unresolved");
    assert_eq!(body["complaints"][0]["submittedOn"], "2024-03-01");
    assert_eq!(body["complaints"][1]["userId"], TEST_USER_ID);
}

#[actix_web::test]
async fn admin_list_passes_filter_and_flattens_entries() {
    let mut ports = MockPorts::default();
    ports
        .complaints_query
        .expect_overview()
        .withf(|filter| {
            filter.status == "unresolved" && filter.category == "IT Support" && filter.query.is_empty()
        })
        .returning(|_| {
            Ok(ComplaintOverview {
                entries: vec![ComplaintEntry {
                    complaint: complaint("c1", Status::Unresolved),
                    submitter_email: Some(Email::new("ada@college.edu").expect("email")),
                }],
                stats: ComplaintStats {
                    total: 3,
                    resolved: 2,
                    unresolved: 1,
                },
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/complaints?status=unresolved&category=IT%20Support")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["complaints"][0]["id"], "c1");
    assert_eq!(body["complaints"][0]["submitterEmail"], "ada@college.edu");
    assert_eq!(body["stats"]["total"], 3);
}

#[rstest]
#[case("status=open", "status")]
#[case("priority=urgent", "priority")]
#[actix_web::test]
async fn admin_list_rejects_unknown_filter_values(#[case] query: &str, #[case] field: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/complaints?{query}"))
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn students_cannot_see_admin_list() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = sign_in_as(&app, Admission::Student).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/complaints")
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_sets_status() {
    let mut ports = MockPorts::default();
    ports
        .complaints
        .expect_set_status()
        .withf(|id, status| id.as_ref() == "c1" && *status == Status::Resolved)
        .times(1)
        .returning(|_, status| Ok(complaint("c1", status)));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::put()
        .uri("/api/v1/complaints/c1/status")
        .cookie(cookie)
        .set_json(json!({ "status": "Resolved" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "resolved");
}

#[actix_web::test]
async fn missing_status_is_rejected() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::put()
        .uri("/api/v1/complaints/c1/status")
        .cookie(cookie)
        .set_json(json!({}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn toggle_of_unknown_complaint_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .complaints
        .expect_toggle_status()
        .returning(|id| Err(Error::not_found(format!("complaint {id} not found"))));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/complaints/ghost/status/toggle")
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_appends_feedback_as_author() {
    let mut ports = MockPorts::default();
    ports
        .complaints
        .expect_add_feedback()
        .withf(|id, author, message, expected| {
            id.as_ref() == "c1"
                && author.as_ref() == TEST_USER_ID
                && message.as_ref() == "Technician booked"
                && *expected == Some(4)
        })
        .times(1)
        .returning(|_, author, message, _| {
            Ok(complaint("c1", Status::Unresolved)
                .with_feedbacks(vec![Feedback {
                    message,
                    timestamp: stamp(),
                    author_id: author.clone(),
                }])
                .with_revision(5))
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/complaints/c1/feedbacks")
        .cookie(cookie)
        .set_json(json!({ "message": "  Technician booked ", "expectedRevision": 4 }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["revision"], 5);
    assert_eq!(body["feedbacks"][0]["authorId"], TEST_USER_ID);
    assert_eq!(body["feedbacks"][0]["timestamp"], "2024-03-01T09:30:00Z");
}

#[actix_web::test]
async fn blank_feedback_is_rejected() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/complaints/c1/feedbacks")
        .cookie(cookie)
        .set_json(json!({ "message": "   " }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "message");
}

#[actix_web::test]
async fn stale_feedback_removal_is_a_conflict() {
    let mut ports = MockPorts::default();
    ports
        .complaints
        .expect_remove_feedback()
        .withf(|id, key, expected| {
            id.as_ref() == "c1"
                && key.timestamp == stamp()
                && key.message == "Technician booked"
                && *expected == Some(2)
        })
        .times(1)
        .returning(|_, _, _| Err(Error::conflict("complaint changed since it was read")));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in_as(&app, Admission::Admin).await;

    let req = actix_test::TestRequest::delete()
        .uri("/api/v1/complaints/c1/feedbacks")
        .cookie(cookie)
        .set_json(json!({
            "timestamp": "2024-03-01T09:30:00Z",
            "message": "Technician booked",
            "expectedRevision": 2
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}
