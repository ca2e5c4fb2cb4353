use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::services::notification_service::{
    EmailReceipt, EmailTransport, NotificationError, OutgoingEmail,
};

pub const ETHEREAL_API_URL: &str = "https://api.nodemailer.com/user";
const GMAIL_RELAY: &str = "smtp.gmail.com";

/// Which email transport a configuration selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailMode {
    Relay { user: String, pass: String },
    Sandbox,
}

impl EmailMode {
    pub fn select(config: &Config) -> Self {
        match config.email_credentials() {
            Some((user, pass)) => EmailMode::Relay {
                user: user.to_string(),
                pass: pass.to_string(),
            },
            None => EmailMode::Sandbox,
        }
    }
}

#[derive(Debug, Serialize)]
struct EtherealAccountRequest<'a> {
    requestor: &'a str,
    version: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EtherealSmtp {
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EtherealAccount {
    pub user: String,
    pub pass: String,
    pub smtp: EtherealSmtp,
    pub web: String,
}

#[derive(Debug, Clone)]
enum MailerKind {
    Relay,
    Sandbox { account: String, web_url: String },
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    kind: MailerKind,
}

impl SmtpMailer {
    pub fn gmail(user: &str, pass: &str, from: &str) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(GMAIL_RELAY)?
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        Ok(Self {
            transport,
            from: from.parse()?,
            kind: MailerKind::Relay,
        })
    }

    /// Provisions a disposable Ethereal account and builds a transport for it.
    pub async fn ethereal(
        client: &Client,
        api_url: &str,
        from: &str,
    ) -> Result<Self, NotificationError> {
        let account = create_ethereal_account(client, api_url).await?;
        Self::for_ethereal_account(account, from)
    }

    pub fn for_ethereal_account(
        account: EtherealAccount,
        from: &str,
    ) -> Result<Self, NotificationError> {
        let credentials = Credentials::new(account.user.clone(), account.pass);
        let builder = if account.smtp.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&account.smtp.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&account.smtp.host)?
        };
        let transport = builder
            .port(account.smtp.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: from.parse()?,
            kind: MailerKind::Sandbox {
                account: account.user,
                web_url: account.web,
            },
        })
    }

    pub fn is_sandbox(&self) -> bool {
        matches!(self.kind, MailerKind::Sandbox { .. })
    }

    /// The sandbox login, if this mailer delivers to Ethereal.
    pub fn account(&self) -> Option<&str> {
        match &self.kind {
            MailerKind::Sandbox { account, .. } => Some(account),
            MailerKind::Relay => None,
        }
    }

    fn preview_url(&self, response: &str) -> Option<String> {
        match &self.kind {
            MailerKind::Sandbox { web_url, .. } => ethereal_preview_url(web_url, response),
            MailerKind::Relay => None,
        }
    }
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, NotificationError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))?;

        let response = self.transport.send(message).await?;
        let text = format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );

        Ok(EmailReceipt {
            preview_url: self.preview_url(&text),
            response: text,
        })
    }
}

pub async fn create_ethereal_account(
    client: &Client,
    api_url: &str,
) -> Result<EtherealAccount, NotificationError> {
    let resp = client
        .post(api_url)
        .json(&EtherealAccountRequest {
            requestor: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        })
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

    let body = resp.json::<serde_json::Value>().await?;
    if body["status"] != "success" {
        let reason = body["error"].as_str().unwrap_or("unexpected response");
        return Err(NotificationError::Sandbox(reason.to_string()));
    }
    serde_json::from_value(body).map_err(|e| NotificationError::Sandbox(e.to_string()))
}

/// Ethereal acknowledges a message with `250 Accepted [STATUS=new MSGID=...]`;
/// the MSGID addresses the message in the web inbox.
pub fn ethereal_preview_url(web_url: &str, response: &str) -> Option<String> {
    let msg_id = response
        .split(|c: char| c.is_whitespace() || c == '[' || c == ']')
        .find_map(|token| token.strip_prefix("MSGID="))
        .filter(|id| !id.is_empty())?;

    Some(format!(
        "{}/message/{}",
        web_url.trim_end_matches('/'),
        msg_id
    ))
}
