//! Notification intents produced by bookings.
//!
//! The store only describes what should be sent. Delivery belongs to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Delivery channel for a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationChannel {
    Email,
    WhatsApp,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message the host should deliver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationIntent {
    pub channel: NotificationChannel,
    /// E-mail address or phone number, depending on channel
    pub recipient: String,
    pub appointment_id: u64,
    pub patient_id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_display() {
        assert_eq!(NotificationChannel::Email.to_string(), "email");
        assert_eq!(NotificationChannel::WhatsApp.to_string(), "whatsapp");
    }
}
