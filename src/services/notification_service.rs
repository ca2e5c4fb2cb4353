use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::application::NewApplication;
use crate::services::email_service::{EmailMode, SmtpMailer, ETHEREAL_API_URL};
use crate::services::sms_service::TwilioSms;
use crate::utils::html::escape_html;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("sandbox account unavailable: {0}")]
    Sandbox(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingSms {
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailReceipt {
    pub response: String,
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsReceipt {
    pub sid: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, NotificationError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send(&self, sms: &OutgoingSms) -> Result<SmsReceipt, NotificationError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailOutcome {
    pub delivered: bool,
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmsOutcome {
    pub attempted: bool,
    pub delivered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub email: EmailOutcome,
    pub sms: SmsOutcome,
}

/// Confirmation content for one stored application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
}

impl From<&NewApplication> for Confirmation {
    fn from(app: &NewApplication) -> Self {
        Self {
            full_name: app.full_name.clone(),
            email: app.email.clone(),
            phone: app.phone.clone(),
            position: app.position.clone(),
        }
    }
}

impl Confirmation {
    pub fn email(&self) -> OutgoingEmail {
        let name = escape_html(&self.full_name);
        let position = escape_html(&self.position);

        OutgoingEmail {
            to: self.email.clone(),
            subject: "Your request for received successfully".to_string(),
            text_body: format!(
                "Hello {},\n\nYour request for {} received successfully.\n\nThank you,\nRecruitment Team",
                self.full_name, self.position
            ),
            html_body: format!(
                r#"<div style="font-family: Arial, sans-serif; padding: 20px; border: 1px solid #eee; border-radius: 10px;">
  <h2 style="color: #4f46e5;">Request Received Successfully</h2>
  <p>Hello <strong>{name}</strong>,</p>
  <p>Your request for <strong>{position}</strong> received successfully.</p>
  <p>We will review your details and get back to you shortly.</p>
  <br>
  <p>Thank you,</p>
  <p><strong>Recruitment Team</strong></p>
</div>"#
            ),
        }
    }

    pub fn sms(&self) -> OutgoingSms {
        OutgoingSms {
            to: self.phone.clone(),
            body: format!(
                "Hello {}! Your application for {} has been received successfully. We'll be in touch soon. - Recruitment Team",
                self.full_name, self.position
            ),
        }
    }
}

/// Best-effort email and SMS delivery. Every failure is logged and swallowed.
#[derive(Clone)]
pub struct NotificationDispatcher {
    email: Option<Arc<dyn EmailTransport>>,
    sms: Option<Arc<dyn SmsTransport>>,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        email: Option<Arc<dyn EmailTransport>>,
        sms: Option<Arc<dyn SmsTransport>>,
        timeout: Duration,
    ) -> Self {
        Self {
            email,
            sms,
            timeout,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, None, Duration::from_secs(10))
    }

    /// Builds the channels described by `config`. Missing credentials disable
    /// SMS; missing email credentials switch email to an Ethereal sandbox.
    pub async fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.notification_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client for notifications");
                Client::new()
            });

        let email: Option<Arc<dyn EmailTransport>> = match EmailMode::select(config) {
            EmailMode::Relay { user, pass } => {
                match SmtpMailer::gmail(&user, &pass, &config.email_from) {
                    Ok(mailer) => {
                        info!(user = %user, "Real email service configured");
                        Some(Arc::new(mailer))
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to configure email service");
                        None
                    }
                }
            }
            EmailMode::Sandbox => {
                match SmtpMailer::ethereal(&client, ETHEREAL_API_URL, &config.email_from).await {
                    Ok(mailer) => {
                        info!(
                            user = mailer.account().unwrap_or_default(),
                            "Ethereal email configured (sandbox mode)"
                        );
                        Some(Arc::new(mailer))
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to create Ethereal account");
                        None
                    }
                }
            }
        };

        let sms: Option<Arc<dyn SmsTransport>> = match config.sms_credentials() {
            Some(credentials) => {
                info!("Twilio SMS service configured");
                Some(Arc::new(TwilioSms::new(client, credentials)))
            }
            None => {
                info!("Twilio SMS not configured (optional feature)");
                None
            }
        };

        Self::new(email, sms, config.notification_timeout)
    }

    pub fn email_enabled(&self) -> bool {
        self.email.is_some()
    }

    pub fn sms_enabled(&self) -> bool {
        self.sms.is_some()
    }

    pub async fn send_email(&self, email: &OutgoingEmail) -> EmailOutcome {
        let Some(transport) = &self.email else {
            return EmailOutcome::default();
        };

        match tokio::time::timeout(self.timeout, transport.send(email)).await {
            Ok(Ok(receipt)) => {
                info!(response = %receipt.response, "Confirmation email sent");
                if let Some(url) = &receipt.preview_url {
                    info!(preview_url = %url, "Email preview available");
                }
                EmailOutcome {
                    delivered: true,
                    preview_url: receipt.preview_url,
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "Error sending email");
                EmailOutcome::default()
            }
            Err(_) => {
                let e = NotificationError::Timeout(self.timeout);
                warn!(error = %e, "Error sending email");
                EmailOutcome::default()
            }
        }
    }

    pub async fn send_sms(&self, sms: &OutgoingSms) -> SmsOutcome {
        let Some(transport) = &self.sms else {
            return SmsOutcome::default();
        };

        let delivered = match tokio::time::timeout(self.timeout, transport.send(sms)).await {
            Ok(Ok(receipt)) => {
                info!(sid = receipt.sid.as_deref().unwrap_or("-"), "Confirmation SMS sent");
                true
            }
            Ok(Err(e)) => {
                error!(error = %e, "Error sending SMS");
                false
            }
            Err(_) => {
                let e = NotificationError::Timeout(self.timeout);
                warn!(error = %e, "Error sending SMS");
                false
            }
        };

        SmsOutcome {
            attempted: true,
            delivered,
        }
    }

    /// Sends both confirmations and waits for each channel to finish.
    pub async fn notify_submission(&self, confirmation: &Confirmation) -> DispatchOutcome {
        let email = confirmation.email();
        let sms = confirmation.sms();
        let (email, sms) = tokio::join!(self.send_email(&email), self.send_sms(&sms));
        DispatchOutcome { email, sms }
    }
}
