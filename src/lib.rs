pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    application_store::ApplicationStore, intake_service::IntakeService,
    listing_service::ListingService, notification_service::NotificationDispatcher,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ChannelStatus {
    pub email: bool,
    pub sms: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub intake_service: IntakeService,
    pub listing_service: ListingService,
    pub channels: ChannelStatus,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        dispatcher: NotificationDispatcher,
        config: &Config,
    ) -> Self {
        let channels = ChannelStatus {
            email: dispatcher.email_enabled(),
            sms: dispatcher.sms_enabled(),
        };
        let intake_service =
            IntakeService::new(store.clone(), dispatcher, config.await_notifications);
        let listing_service = ListingService::new(store);

        Self {
            intake_service,
            listing_service,
            channels,
        }
    }
}
