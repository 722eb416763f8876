//! Router tests driven through `tower::ServiceExt::oneshot`.

use admissions_core::Database;
use admissions_server::{router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(Database::open_in_memory().unwrap()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn intake(first: &str, last: &str) -> Value {
    json!({
        "firstName": first,
        "lastName": last,
        "middleName": "Protacio",
        "dateOfBirth": "1961-06-19",
        "sex": "M",
        "height": 160.0,
        "maritalStatus": "Single",
        "complaints": "Cough",
        "medications": "None",
        "password": "noli-me-tangere"
    })
}

async fn hire_doctor(app: &Router) -> i64 {
    let (status, doctor) = send(
        app,
        Method::POST,
        "/admin/doctors",
        Some(json!({
            "doctorName": "Dr. Blumentritt",
            "shiftStart": "00:00:00",
            "shiftEnd": "23:59:59",
            "password": "ferdinand"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(doctor.get("passwordHash").is_none());
    doctor["doctorId"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_new_admission_through_discharge() {
    let app = app();

    let (status, admitted) = send(&app, Method::POST, "/admission/new", Some(intake("Jose", "Rizal"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admitted["patient"]["patientId"], "PAT-JR-1");
    assert!(admitted["patient"].get("passwordHash").is_none());
    let admission_id = admitted["admission"]["admissionId"].as_i64().unwrap();

    let (_, total) = send(&app, Method::GET, "/admin/admissions/noDoctor/total", None).await;
    assert_eq!(total["total"], 1);

    let doctor_id = hire_doctor(&app).await;
    let (status, assigned) = send(
        &app,
        Method::PUT,
        &format!("/admin/admissions/{}", admission_id),
        Some(json!({ "doctorID": doctor_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["doctorId"], doctor_id);

    let (_, ward) = send(&app, Method::GET, &format!("/doctor/{}/patients", doctor_id), None).await;
    assert_eq!(ward[0]["fullName"], "Jose Rizal Protacio");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/doctor/admissions/{}/diagnosis", admission_id),
        Some(json!({ "diagnosis": "Bronchitis" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let discharge = format!("/doctor/admissions/{}/discharge", admission_id);
    let (status, discharged) = send(&app, Method::PUT, &discharge, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(discharged["dischargeDate"].is_string());

    let (status, body) = send(&app, Method::PUT, &discharge, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (_, active) = send(&app, Method::GET, "/admin/admissions/notDischarge", None).await;
    assert_eq!(active, json!([]));

    let (_, history) = send(&app, Method::GET, "/patient/PAT-JR-1/admissions", None).await;
    assert_eq!(history[0]["diagnosis"], "Bronchitis");
    assert_eq!(history[0]["doctorName"], "Dr. Blumentritt");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = app();
    send(&app, Method::POST, "/admission/new", Some(intake("Jose", "Rizal"))).await;

    let (status, ok) = send(
        &app,
        Method::POST,
        "/patient/login",
        Some(json!({ "patientID": "PAT-JR-1", "password": "noli-me-tangere" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ok["firstName"], "Jose");

    let (wrong_status, wrong) = send(
        &app,
        Method::POST,
        "/patient/login",
        Some(json!({ "patientID": "PAT-JR-1", "password": "el-filibusterismo" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        Method::POST,
        "/patient/login",
        Some(json!({ "patientID": "PAT-XX-1", "password": "noli-me-tangere" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["message"], "Wrong credentials");
    assert_eq!(wrong, unknown);

    let (status, _) = send(
        &app,
        Method::POST,
        "/doctor/login",
        Some(json!({ "doctorID": 42, "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_returning_patient_login_admission() {
    let app = app();
    send(&app, Method::POST, "/admission/new", Some(intake("Jose", "Rizal"))).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/admission/returning/login",
        Some(json!({ "patientID": "PAT-JR-1", "password": "wrong", "complaints": "Headache" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, admitted) = send(
        &app,
        Method::POST,
        "/admission/returning/login",
        Some(json!({ "patientID": "PAT-JR-1", "password": "noli-me-tangere", "complaints": "Headache" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admitted["admission"]["complaints"], "Headache");

    let (_, total) = send(&app, Method::GET, "/patient/PAT-JR-1/admissions/total", None).await;
    assert_eq!(total["total"], 2);

    let (status, _) = send(
        &app,
        Method::POST,
        "/admission/returning",
        Some(json!({ "patientID": "PAT-NO-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patient_details_and_password() {
    let app = app();
    send(&app, Method::POST, "/admission/new", Some(intake("Jose", "Rizal"))).await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/patient/PAT-JR-1/details",
        Some(json!({ "city": "Calamba", "weight": 58.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "Calamba");
    assert_eq!(updated["height"], 160.0);
    assert_eq!(updated["patientId"], "PAT-JR-1");

    let (status, _) = send(&app, Method::PUT, "/admin/patients/PAT-NO-1", Some(json!({ "city": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let change = |original: &str| json!({ "originalPassword": original, "newPassword": "dapitan" });
    let (status, _) = send(&app, Method::PUT, "/patient/PAT-JR-1/password", Some(change("nope"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        Method::PUT,
        "/admin/patients/PAT-JR-1/password",
        Some(change("noli-me-tangere")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/patient/login",
        Some(json!({ "patientID": "PAT-JR-1", "password": "dapitan" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_visitor_administration() {
    let app = app();
    send(&app, Method::POST, "/admission/new", Some(intake("Jose", "Rizal"))).await;

    let mut ids = Vec::new();
    for name in ["Paciano", "Narcisa", "Josephine"] {
        let (status, visitor) = send(
            &app,
            Method::POST,
            "/patient/PAT-JR-1/visitors",
            Some(json!({ "visitorName": name, "relationship": "Family" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(visitor["visitorId"].as_i64().unwrap());
    }

    let (status, _) = send(
        &app,
        Method::POST,
        "/patient/PAT-NO-1/visitors",
        Some(json!({ "visitorName": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, total) = send(&app, Method::GET, "/patient/PAT-JR-1/visitors/total", None).await;
    assert_eq!(total["total"], 3);

    // Today's visits survive every retention window.
    let (status, purged) = send(&app, Method::DELETE, "/admin/visitors/older/1m", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purged["deleted"], 0);

    let (_, deleted) = send(&app, Method::DELETE, "/admin/visitors", Some(json!({ "ids": [ids[0], ids[1]] }))).await;
    assert_eq!(deleted["deleted"], 2);

    let (status, _) = send(&app, Method::DELETE, &format!("/admin/visitors/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, deleted) = send(&app, Method::DELETE, "/admin/visitors/all", None).await;
    assert_eq!(deleted["deleted"], 1);

    let (_, total) = send(&app, Method::GET, "/admin/visitors/total", None).await;
    assert_eq!(total["total"], 0);
}

#[tokio::test]
async fn test_doctor_filters_and_reports() {
    let app = app();
    hire_doctor(&app).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/admin/doctors",
        Some(json!({
            "doctorName": "Dr. Away",
            "shiftStart": "08:00:00",
            "shiftEnd": "16:00:00",
            "status": "OnLeave"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = send(&app, Method::GET, "/admin/doctors/total", None).await;
    assert_eq!(all["total"], 2);
    let (_, on_leave) = send(&app, Method::GET, "/admin/doctors/onLeave", None).await;
    assert_eq!(on_leave[0]["doctorName"], "Dr. Away");
    let (_, active) = send(&app, Method::GET, "/admin/doctors/active/total", None).await;
    assert_eq!(active["total"], 1);

    send(&app, Method::POST, "/admission/new", Some(intake("Jose", "Rizal"))).await;
    let (status, daily) = send(&app, Method::GET, "/admin/reports/dailyAdmissions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(daily[0]["total"], 1);

    let (status, marital) = send(&app, Method::GET, "/admin/reports/maritalStatus", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marital, json!([]));
}

#[tokio::test]
async fn test_bulk_visitor_delete_accepts_large_id_sets() {
    let app = app();
    send(&app, Method::POST, "/admission/new", Some(intake("Jose", "Rizal"))).await;
    let (_, visitor) = send(
        &app,
        Method::POST,
        "/patient/PAT-JR-1/visitors",
        Some(json!({ "visitorName": "Paciano" })),
    )
    .await;

    let mut ids: Vec<i64> = (100_000..140_000).collect();
    ids.push(visitor["visitorId"].as_i64().unwrap());

    let (status, deleted) = send(&app, Method::DELETE, "/admin/visitors", Some(json!({ "ids": ids }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted"], 1);
}
