use std::time::Duration;
use std::time::SystemTime;

const VISIBLE_FOR: Duration = Duration::from_secs(5);

pub enum NotificationLevel {
    Error,
    None,
    Info,
}

pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    expires: SystemTime,
}

impl Notification {
    pub(crate) fn none() -> Notification {
        Notification {
            message: "".to_string(),
            level: NotificationLevel::None,
            expires: SystemTime::now(),
        }
    }

    pub(crate) fn error(message: String) -> Self {
        Self::expiring(message, NotificationLevel::Error)
    }

    pub(crate) fn info(message: String) -> Self {
        Self::expiring(message, NotificationLevel::Info)
    }

    fn expiring(message: String, level: NotificationLevel) -> Self {
        Notification {
            message,
            level,
            expires: SystemTime::now()
                .checked_add(VISIBLE_FOR)
                .unwrap_or_else(SystemTime::now),
        }
    }

    pub fn is_visible(&self) -> bool {
        SystemTime::now() < self.expires
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(!Notification::none().is_visible());
        assert!(Notification::info("exited".to_string()).is_visible());
        assert!(Notification::error("failed".to_string()).is_visible());
    }
}
