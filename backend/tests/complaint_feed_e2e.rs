//! End-to-end checks for the student complaint feed.
//!
//! A student's socket receives a fresh snapshot whenever a complaint is
//! written, whether by the student or by an admin.

// The harness also carries the behaviour-test world, unused here.
#[allow(dead_code)]
#[path = "portal_support/mod.rs"]
mod portal_support;

use actix_web::cookie::Cookie;
use actix_web::http::header;
use awc::{BoxedSocket, Client, ws::Codec, ws::Frame};
use futures_util::StreamExt;
use portal_support::{ADMIN_EMAIL, PASSWORD, PortalServer, sign_up_body, spawn_portal_server};
use serde_json::{Value, json};

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

const STUDENT_EMAIL: &str = "ada@college.edu";

async fn session_for(server: &PortalServer, email: &str, role: &str, tab: &str) -> Cookie<'static> {
    let client = Client::default();
    let created = client
        .post(format!("{}/api/v1/signup", server.base_url))
        .send_json(&sign_up_body(email, role))
        .await
        .expect("sign-up request");
    assert_eq!(created.status().as_u16(), 201);

    let response = client
        .post(format!("{}/api/v1/login", server.base_url))
        .send_json(&json!({ "tab": tab, "email": email, "password": PASSWORD }))
        .await
        .expect("login request");
    assert_eq!(response.status().as_u16(), 200);
    response
        .cookie("session")
        .expect("session cookie")
        .into_owned()
}

async fn connect(server: &PortalServer, cookie: Cookie<'static>, origin: &str) -> Result<Socket, u16> {
    let request = Client::default()
        .ws(format!("{}/ws/complaints", server.base_url))
        .set_header(header::ORIGIN, origin)
        .cookie(cookie);
    match request.connect().await {
        Ok((_response, socket)) => Ok(socket),
        Err(awc::error::WsClientError::InvalidResponseStatus(status)) => Err(status.as_u16()),
        Err(other) => panic!("unexpected websocket error: {other}"),
    }
}

async fn next_snapshot(socket: &mut Socket) -> Value {
    loop {
        let frame = socket.next().await.expect("frame").expect("valid frame");
        match frame {
            Frame::Text(bytes) => {
                let value: Value = serde_json::from_slice(&bytes).expect("json frame");
                assert_eq!(value.get("type").and_then(Value::as_str), Some("snapshot"));
                return value;
            }
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

fn total(snapshot: &Value) -> Option<u64> {
    snapshot
        .get("stats")
        .and_then(|stats| stats.get("total"))
        .and_then(Value::as_u64)
}

#[actix_rt::test]
async fn feed_follows_student_and_admin_writes() {
    let server = spawn_portal_server().await.expect("server");
    let student = session_for(&server, STUDENT_EMAIL, "student", "student").await;
    let admin = session_for(&server, ADMIN_EMAIL, "admin", "admin").await;

    let mut socket = connect(&server, student.clone(), "http://localhost:3000")
        .await
        .expect("upgrade");
    assert_eq!(total(&next_snapshot(&mut socket).await), Some(0));

    let created: Value = Client::default()
        .post(format!("{}/api/v1/complaints", server.base_url))
        .cookie(student)
        .send_json(&json!({
            "title": "Wi-Fi drops in the library",
            "description": "Every afternoon around three",
            "category": "IT Support",
            "agreement": true,
        }))
        .await
        .expect("submit request")
        .json()
        .await
        .expect("created body");
    let id = created.get("id").and_then(Value::as_str).expect("id").to_owned();

    let after_submit = next_snapshot(&mut socket).await;
    assert_eq!(total(&after_submit), Some(1));

    let response = Client::default()
        .post(format!("{}/api/v1/complaints/{id}/status/toggle", server.base_url))
        .cookie(admin)
        .send()
        .await
        .expect("toggle request");
    assert_eq!(response.status().as_u16(), 200);

    let after_toggle = next_snapshot(&mut socket).await;
    let status = after_toggle
        .get("complaints")
        .and_then(Value::as_array)
        .and_then(|complaints| complaints.first())
        .and_then(|complaint| complaint.get("status"))
        .and_then(Value::as_str);
    assert_eq!(status, Some("resolved"));

    server.handle.stop(false).await;
}

#[actix_rt::test]
async fn foreign_origins_and_admin_sessions_are_refused() {
    let server = spawn_portal_server().await.expect("server");
    let student = session_for(&server, STUDENT_EMAIL, "student", "student").await;
    let admin = session_for(&server, ADMIN_EMAIL, "admin", "admin").await;

    let foreign = connect(&server, student, "https://elsewhere.example").await;
    assert_eq!(foreign.err(), Some(403));

    let as_admin = connect(&server, admin, "http://localhost:3000").await;
    assert_eq!(as_admin.err(), Some(403));

    server.handle.stop(false).await;
}

#[actix_rt::test]
async fn logging_out_closes_the_open_feed() {
    let server = spawn_portal_server().await.expect("server");
    let student = session_for(&server, STUDENT_EMAIL, "student", "student").await;
    let mut socket = connect(&server, student.clone(), "http://localhost:3000")
        .await
        .expect("upgrade");
    assert_eq!(total(&next_snapshot(&mut socket).await), Some(0));

    let response = Client::default()
        .post(format!("{}/api/v1/logout", server.base_url))
        .cookie(student)
        .send()
        .await
        .expect("logout request");
    assert_eq!(response.status().as_u16(), 204);

    let reason = loop {
        match socket.next().await.expect("frame").expect("valid frame") {
            Frame::Ping(_) | Frame::Pong(_) => continue,
            Frame::Close(reason) => break reason.expect("close reason"),
            other => panic!("expected close frame, got {other:?}"),
        }
    };
    assert_eq!(reason.description.as_deref(), Some("signed out"));

    server.handle.stop(false).await;
}
