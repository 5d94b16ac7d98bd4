//! Push notification surface.
//!
//! Decorative: a push payload becomes a notification with a fixed set of
//! fields, and a click on the "view" action opens the root page. No
//! routing or caching involvement.

use serde::Serialize;

use shellproxy_core::WorkerConfig;

const NOTIFICATION_ICON: &str = "/icons/icon-192x192.png";
const NOTIFICATION_BADGE: &str = "/icons/icon-72x72.png";

/// One tappable action on a displayed notification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

/// A notification ready for display by the host runtime.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationAction>,
}

/// Command handed back to the host after a notification click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Open a window/tab at the given path.
    OpenWindow(String),
}

/// Builds notifications from push payloads and resolves click actions.
#[derive(Debug, Clone)]
pub struct PushHandler {
    title: String,
    default_body: String,
}

impl PushHandler {
    /// Build the handler with the configured product name.
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            title: config.app_name.clone(),
            default_body: format!("New notification from {}", config.app_name),
        }
    }

    /// Build the notification for a push event.
    ///
    /// The payload, if present, is treated as plain text for the body;
    /// absence yields the default string.
    pub fn on_push(&self, payload: Option<&[u8]>) -> Notification {
        let body = payload
            .map(|data| String::from_utf8_lossy(data).into_owned())
            .unwrap_or_else(|| self.default_body.clone());

        Notification {
            title: self.title.clone(),
            body,
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_BADGE.to_string(),
            vibrate: vec![100, 50, 100],
            actions: vec![
                NotificationAction {
                    action: "view".into(),
                    title: "View Details".into(),
                    icon: NOTIFICATION_BADGE.into(),
                },
                NotificationAction {
                    action: "close".into(),
                    title: "Close".into(),
                    icon: NOTIFICATION_BADGE.into(),
                },
            ],
        }
    }

    /// Resolve a notification click into a host command.
    pub fn on_notification_click(&self, action: &str) -> Option<ClientCommand> {
        match action {
            "view" => Some(ClientCommand::OpenWindow("/".to_string())),
            _ => None,
        }
    }
}
