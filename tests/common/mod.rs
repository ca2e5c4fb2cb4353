#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use application_portal::{
    config::Config,
    database::pool::create_pool,
    routes,
    services::{
        application_store::{ApplicationStore, SqliteApplicationStore},
        notification_service::{
            EmailReceipt, EmailTransport, NotificationDispatcher, NotificationError,
            OutgoingEmail, OutgoingSms, SmsReceipt, SmsTransport,
        },
    },
    AppState,
};
use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;

pub const INDEX_HTML: &str = "<!doctype html><title>Application Portal</title>";

pub struct TestEnv {
    pub dir: TempDir,
    pub store: Arc<SqliteApplicationStore>,
}

impl TestEnv {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let static_dir = dir.path().join("dist");
        std::fs::create_dir_all(&static_dir).expect("create static dir");
        std::fs::write(static_dir.join("index.html"), INDEX_HTML).expect("write index.html");
        let store = open_store(&dir).await;
        Self {
            dir,
            store: Arc::new(store),
        }
    }

    pub fn database_url(&self) -> String {
        database_url(&self.dir)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.dir.path().join("dist")
    }

    /// A second handle on the same database file.
    pub async fn reopen(&self) -> SqliteApplicationStore {
        open_store(&self.dir).await
    }

    pub fn router(&self, dispatcher: NotificationDispatcher) -> Router {
        let config = Config {
            static_dir: self.static_dir(),
            ..Config::default()
        };
        let state = AppState::new(self.store.clone(), dispatcher, &config);
        routes::router(state, &config.static_dir)
    }
}

fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("applications.db").display())
}

async fn open_store(dir: &TempDir) -> SqliteApplicationStore {
    let pool = create_pool(&database_url(dir)).await.expect("pool");
    let store = SqliteApplicationStore::new(pool);
    store.initialize().await.expect("initialize store");
    store
}

pub fn valid_payload() -> JsonValue {
    json!({
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+15550001111",
        "position": "Backend Developer",
        "experience": "7",
        "bio": "I like analytical engines."
    })
}

#[derive(Default)]
pub struct FakeEmail {
    pub sent: AtomicUsize,
    pub preview_url: Option<String>,
}

impl FakeEmail {
    pub fn with_preview(url: &str) -> Self {
        Self {
            sent: AtomicUsize::new(0),
            preview_url: Some(url.to_string()),
        }
    }

    pub fn count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailTransport for FakeEmail {
    async fn send(&self, _email: &OutgoingEmail) -> Result<EmailReceipt, NotificationError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(EmailReceipt {
            response: "250 Accepted".to_string(),
            preview_url: self.preview_url.clone(),
        })
    }
}

#[derive(Default)]
pub struct FakeSms {
    pub sent: AtomicUsize,
}

impl FakeSms {
    pub fn count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsTransport for FakeSms {
    async fn send(&self, _sms: &OutgoingSms) -> Result<SmsReceipt, NotificationError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(SmsReceipt {
            sid: Some("SM00000000000000000000000000000000".to_string()),
        })
    }
}

/// Never answers within any reasonable timeout.
pub struct HangingEmail;

#[async_trait]
impl EmailTransport for HangingEmail {
    async fn send(&self, _email: &OutgoingEmail) -> Result<EmailReceipt, NotificationError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(EmailReceipt::default())
    }
}

pub fn dispatcher(
    email: Option<Arc<FakeEmail>>,
    sms: Option<Arc<FakeSms>>,
) -> NotificationDispatcher {
    NotificationDispatcher::new(
        email.map(|e| e as Arc<dyn EmailTransport>),
        sms.map(|s| s as Arc<dyn SmsTransport>),
        Duration::from_secs(2),
    )
}
