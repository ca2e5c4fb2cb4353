use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::SmsCredentials;
use crate::services::notification_service::{
    NotificationError, OutgoingSms, SmsReceipt, SmsTransport,
};

pub const TWILIO_API_URL: &str = "https://api.twilio.com";

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: Option<String>,
}

/// Sends SMS through the Twilio Messages REST endpoint.
#[derive(Clone)]
pub struct TwilioSms {
    client: Client,
    credentials: SmsCredentials,
    base_url: String,
}

impl TwilioSms {
    pub fn new(client: Client, credentials: SmsCredentials) -> Self {
        Self::with_base_url(client, credentials, TWILIO_API_URL)
    }

    pub fn with_base_url(client: Client, credentials: SmsCredentials, base_url: &str) -> Self {
        Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.credentials.account_id
        )
    }
}

#[async_trait]
impl SmsTransport for TwilioSms {
    async fn send(&self, sms: &OutgoingSms) -> Result<SmsReceipt, NotificationError> {
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.credentials.account_id,
                Some(&self.credentials.auth_token),
            )
            .form(&[
                ("To", sms.to.as_str()),
                ("From", self.credentials.from_number.as_str()),
                ("Body", sms.body.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let message = resp.json::<TwilioMessage>().await?;
        Ok(SmsReceipt { sid: message.sid })
    }
}
