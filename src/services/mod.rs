pub mod application_store;
pub mod email_service;
pub mod intake_service;
pub mod listing_service;
pub mod notification_service;
pub mod sms_service;
