use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

/// Payload the external meeting-link collaborator expects. Company attendees
/// travel as one comma-joined string, the interview time as an ISO timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetWebhookPayload {
    pub issue_key: String,
    pub summary: String,
    pub candidate_email: String,
    pub assignee_email: String,
    pub reporter_email: String,
    pub company_emails: String,
    pub interview_date: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetWebhookResponse {
    pub meet_link: Option<String>,
}

/// Client for the meeting-link webhook. There is no automatic retry: a
/// failure is reported back with the collaborator's message verbatim and the
/// caller writes nothing.
#[derive(Clone)]
pub struct MeetService {
    client: Client,
    webhook_url: Option<String>,
}

impl MeetService {
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client for meet webhook");

        let webhook_url = webhook_url.filter(|url| !url.trim().is_empty());

        if let Some(ref url) = webhook_url {
            info!("Meeting webhook enabled, URL: {}", url);
        } else {
            info!("Meeting webhook disabled (MEET_WEBHOOK_URL not set or empty)");
        }

        Self {
            client,
            webhook_url,
        }
    }

    pub fn issue_key(candidate_id: Uuid) -> String {
        format!("CRM-{}", candidate_id)
    }

    /// Requests a meeting link. Errors carry the upstream body so the UI can
    /// show it unchanged.
    pub async fn create_link(&self, payload: &MeetWebhookPayload) -> Result<String, String> {
        let webhook_url = self
            .webhook_url
            .as_deref()
            .ok_or_else(|| "Meeting webhook is not configured".to_string())?;

        info!(
            "Requesting meeting link: issue {} at {}",
            payload.issue_key, payload.interview_date
        );

        let response = self
            .client
            .post(webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Meeting webhook failed with status {}: {}", status, body);
            if body.is_empty() {
                return Err(format!("HTTP {}", status));
            }
            return Err(body);
        }

        let parsed = response
            .json::<MeetWebhookResponse>()
            .await
            .map_err(|e| format!("Malformed webhook response: {}", e))?;

        match parsed.meet_link {
            Some(link) if !link.is_empty() => {
                info!("Meeting link created for issue {}", payload.issue_key);
                Ok(link)
            }
            _ => Err("No meetLink in webhook response".to_string()),
        }
    }
}
