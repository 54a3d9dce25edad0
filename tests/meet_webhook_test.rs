use axum::{http::StatusCode, routing::post, Json, Router};
use crm_backend::services::meet_service::{MeetService, MeetWebhookPayload};
use tokio::net::TcpListener;
use uuid::Uuid;

async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/hook", addr)
}

fn payload() -> MeetWebhookPayload {
    MeetWebhookPayload {
        issue_key: MeetService::issue_key(Uuid::new_v4()),
        summary: "Screening call".to_string(),
        candidate_email: "jane@example.com".to_string(),
        assignee_email: "anna.hr@company.com".to_string(),
        reporter_email: "anna.hr@company.com".to_string(),
        company_emails: "a@b.co,c@d.org".to_string(),
        interview_date: "2024-05-10T09:30:00+00:00".to_string(),
    }
}

#[tokio::test]
async fn issue_key_carries_the_candidate_id() {
    let id = Uuid::new_v4();
    assert_eq!(MeetService::issue_key(id), format!("CRM-{}", id));
}

#[tokio::test]
async fn successful_call_returns_the_link() {
    let router = Router::new().route(
        "/hook",
        post(|Json(body): Json<serde_json::Value>| async move {
            // camelCase contract of the collaborator
            assert!(body["issueKey"].as_str().unwrap().starts_with("CRM-"));
            assert_eq!(body["candidateEmail"], "jane@example.com");
            assert_eq!(body["companyEmails"], "a@b.co,c@d.org");
            Json(serde_json::json!({"meetLink": "https://meet.example/abc-defg-hij"}))
        }),
    );
    let url = spawn_stub(router).await;

    let service = MeetService::new(Some(url));
    let link = service.create_link(&payload()).await.expect("link");
    assert_eq!(link, "https://meet.example/abc-defg-hij");
}

#[tokio::test]
async fn upstream_failure_surfaces_its_body_verbatim() {
    let router = Router::new().route(
        "/hook",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "calendar quota exceeded") }),
    );
    let url = spawn_stub(router).await;

    let service = MeetService::new(Some(url));
    let err = service.create_link(&payload()).await.unwrap_err();
    assert_eq!(err, "calendar quota exceeded");
}

#[tokio::test]
async fn empty_failure_body_falls_back_to_the_status() {
    let router = Router::new().route(
        "/hook",
        post(|| async { StatusCode::BAD_GATEWAY }),
    );
    let url = spawn_stub(router).await;

    let service = MeetService::new(Some(url));
    let err = service.create_link(&payload()).await.unwrap_err();
    assert_eq!(err, "HTTP 502 Bad Gateway");
}

#[tokio::test]
async fn missing_link_in_response_is_an_error() {
    let router = Router::new().route(
        "/hook",
        post(|| async { Json(serde_json::json!({})) }),
    );
    let url = spawn_stub(router).await;

    let service = MeetService::new(Some(url));
    let err = service.create_link(&payload()).await.unwrap_err();
    assert_eq!(err, "No meetLink in webhook response");
}

#[tokio::test]
async fn unconfigured_webhook_is_reported() {
    let service = MeetService::new(None);
    let err = service.create_link(&payload()).await.unwrap_err();
    assert_eq!(err, "Meeting webhook is not configured");
}
