use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_EMAIL_FROM: &str = "\"Application Portal\" <no-reply@example.com>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub static_dir: PathBuf,
    pub email_user: Option<String>,
    pub email_pass: Option<String>,
    pub email_from: String,
    pub sms_account_id: Option<String>,
    pub sms_auth_token: Option<String>,
    pub sms_from_number: Option<String>,
    pub notification_timeout: Duration,
    pub await_notifications: bool,
    pub log_format: LogFormat,
}

/// Twilio credentials; only constructed when all three parts are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsCredentials {
    pub account_id: String,
    pub auth_token: String,
    pub from_number: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            database_url: "sqlite://applications.db".to_string(),
            static_dir: PathBuf::from("dist"),
            email_user: None,
            email_pass: None,
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            sms_account_id: None,
            sms_auth_token: None,
            sms_from_number: None,
            notification_timeout: Duration::from_secs(10),
            await_notifications: true,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            host: get_env("HOST").unwrap_or(defaults.host),
            port: get_env_parse("PORT")?.unwrap_or(defaults.port),
            database_url: get_env("DATABASE_URL").unwrap_or(defaults.database_url),
            static_dir: get_env("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            email_user: get_env("EMAIL_USER"),
            email_pass: get_env("EMAIL_PASS"),
            email_from: get_env("EMAIL_FROM").unwrap_or(defaults.email_from),
            sms_account_id: get_env("TWILIO_ACCOUNT_SID"),
            sms_auth_token: get_env("TWILIO_AUTH_TOKEN"),
            sms_from_number: get_env("TWILIO_PHONE_NUMBER"),
            notification_timeout: get_env_parse("NOTIFICATION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.notification_timeout),
            await_notifications: get_env_parse("AWAIT_NOTIFICATIONS")?
                .unwrap_or(defaults.await_notifications),
            log_format: match get_env("LOG_FORMAT").as_deref() {
                None | Some("text") => LogFormat::Text,
                Some("json") => LogFormat::Json,
                Some(other) => {
                    return Err(Error::Config(format!(
                        "Invalid value for LOG_FORMAT: {}",
                        other
                    )))
                }
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn email_credentials(&self) -> Option<(&str, &str)> {
        match (&self.email_user, &self.email_pass) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }

    pub fn sms_credentials(&self) -> Option<SmsCredentials> {
        match (
            &self.sms_account_id,
            &self.sms_auth_token,
            &self.sms_from_number,
        ) {
            (Some(account_id), Some(auth_token), Some(from_number)) => Some(SmsCredentials {
                account_id: account_id.clone(),
                auth_token: auth_token.clone(),
                from_number: from_number.clone(),
            }),
            _ => None,
        }
    }
}

// Blank values are treated the same as unset ones.
fn get_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get_env(name) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
