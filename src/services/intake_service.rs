use std::sync::Arc;

use tracing::{error, info};

use crate::dto::application_dto::ApplicationPayload;
use crate::error::{Error, Result};
use crate::services::application_store::ApplicationStore;
use crate::services::notification_service::{Confirmation, NotificationDispatcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: i64,
    pub preview_url: Option<String>,
}

/// Validates, stores and confirms incoming applications.
#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn ApplicationStore>,
    dispatcher: NotificationDispatcher,
    await_notifications: bool,
}

impl IntakeService {
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        dispatcher: NotificationDispatcher,
        await_notifications: bool,
    ) -> Self {
        Self {
            store,
            dispatcher,
            await_notifications,
        }
    }

    pub async fn submit(&self, payload: ApplicationPayload) -> Result<Submission> {
        let application = payload.into_new_application()?;

        let id = self.store.insert(&application).await.map_err(|e| {
            error!(error = %e, "Error inserting application");
            Error::SaveFailed
        })?;
        info!(application_id = id, position = %application.position, "Application stored");

        // Notifications run in their own task so a panicking transport
        // cannot take the request down with it.
        let confirmation = Confirmation::from(&application);
        let dispatcher = self.dispatcher.clone();
        let task =
            tokio::spawn(async move { dispatcher.notify_submission(&confirmation).await });

        if !self.await_notifications {
            return Ok(Submission {
                id,
                preview_url: None,
            });
        }

        let preview_url = match task.await {
            Ok(outcome) => outcome.email.preview_url,
            Err(e) => {
                error!(application_id = id, error = %e, "Notification task failed");
                None
            }
        };

        Ok(Submission { id, preview_url })
    }
}
