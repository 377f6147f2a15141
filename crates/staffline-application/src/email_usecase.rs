//! Outbound candidate email.

use staffline_core::gateway::{EmailGateway, EmailReceipt, EmailRequest};
use staffline_core::overlay::{Record, str_field};
use staffline_core::validation::validate_email;
use staffline_core::{Result, StafflineError};
use std::sync::Arc;

const BASE_SUBJECT: &str = "Exciting Travel Healthcare Opportunity";

/// Subject line offered when the email is opened.
pub fn default_subject(job: Option<&Record>) -> String {
    let Some(job) = job else {
        return BASE_SUBJECT.to_string();
    };
    let title = non_blank(job, "title").unwrap_or("Position");
    let place = non_blank(job, "city")
        .or_else(|| non_blank(job, "state"))
        .unwrap_or("Location");
    format!("{BASE_SUBJECT}: {title} in {place}")
}

fn non_blank<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    str_field(record, field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Builds a request for `candidate`, filling the job context from `job`.
///
/// An empty `subject` falls back to [`default_subject`].
pub fn compose(
    candidate: &Record,
    job: Option<&Record>,
    subject: &str,
    message: &str,
) -> EmailRequest {
    let name = [
        non_blank(candidate, "first_name"),
        non_blank(candidate, "last_name"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    let subject = if subject.trim().is_empty() {
        default_subject(job)
    } else {
        subject.trim().to_string()
    };

    let mut request = EmailRequest {
        to_email: non_blank(candidate, "email").unwrap_or_default().to_string(),
        candidate_name: name,
        subject,
        message: message.to_string(),
        ..EmailRequest::default()
    };

    if let Some(job) = job {
        request.job_title = non_blank(job, "title").map(String::from);
        request.facility_name = non_blank(job, "facility_name")
            .or_else(|| non_blank(job, "facility"))
            .map(String::from);
        request.location = match (non_blank(job, "city"), non_blank(job, "state")) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        };
        request.pay_rate = non_blank(job, "pay_package").map(String::from);
        request.start_date = non_blank(job, "start_date").map(String::from);
    }
    request
}

pub struct EmailUseCase {
    email: Arc<dyn EmailGateway>,
}

impl EmailUseCase {
    pub fn new(email: Arc<dyn EmailGateway>) -> Self {
        Self { email }
    }

    /// Sends `request` after checking the recipient and subject.
    pub async fn send(&self, request: &EmailRequest) -> Result<EmailReceipt> {
        if !validate_email(&request.to_email) {
            return Err(StafflineError::validation(
                "Please enter a valid email address",
            ));
        }
        if request.subject.trim().is_empty() {
            return Err(StafflineError::validation("Subject is required"));
        }

        let receipt = self.email.send_to_candidate(request).await?;
        tracing::info!("Email sent to {}", request.to_email);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubApi, record};
    use serde_json::json;

    #[test]
    fn test_default_subject() {
        assert_eq!(default_subject(None), BASE_SUBJECT);
        let job = record(json!({"title": "ICU RN", "state": "TX"}));
        assert_eq!(
            default_subject(Some(&job)),
            "Exciting Travel Healthcare Opportunity: ICU RN in TX"
        );
        let bare = record(json!({"city": ""}));
        assert_eq!(
            default_subject(Some(&bare)),
            "Exciting Travel Healthcare Opportunity: Position in Location"
        );
    }

    #[test]
    fn test_compose_from_records() {
        let candidate = record(json!({
            "first_name": "Maria", "last_name": "Lopez", "email": "maria@rn.io"
        }));
        let job = record(json!({
            "title": "ER RN", "facility": "Mercy", "city": "Austin", "state": "TX",
            "pay_package": "$2,400/wk"
        }));

        let request = compose(&candidate, Some(&job), "", "Call me");
        assert_eq!(request.candidate_name, "Maria Lopez");
        assert_eq!(request.subject, "Exciting Travel Healthcare Opportunity: ER RN in Austin");
        assert_eq!(request.facility_name.as_deref(), Some("Mercy"));
        assert_eq!(request.location.as_deref(), Some("Austin, TX"));
        assert_eq!(request.pay_rate.as_deref(), Some("$2,400/wk"));
        assert_eq!(request.start_date, None);

        let plain = compose(&record(json!({"last_name": "Reed"})), None, "Hi", "");
        assert_eq!(plain.candidate_name, "Reed");
        assert_eq!(plain.job_title, None);
    }

    #[tokio::test]
    async fn test_send_validates_first() {
        let api = Arc::new(StubApi::new());
        let usecase = EmailUseCase::new(api.clone());

        let no_email = compose(&record(json!({"first_name": "Sam"})), None, "Hi", "");
        assert!(usecase.send(&no_email).await.unwrap_err().is_validation());
        assert!(api.calls().is_empty());

        let ok = compose(&record(json!({"email": "sam@rn.io"})), None, "Hi", "");
        let receipt = usecase.send(&ok).await.unwrap();
        assert!(receipt.success);
        assert_eq!(api.emails.lock().unwrap()[0].to_email, "sam@rn.io");
    }
}
