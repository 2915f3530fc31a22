//! Notification port.
//!
//! Core operations report outcomes to the human operator ("payment
//! registered", "coupon invalid") through this sink. The UI implements it
//! with toasts; tests implement it with a Vec.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The tone of a notice, mapped to toast styling by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A sink for user-facing messages.
///
/// Implementations must not fail: a dropped notice is acceptable, a failed
/// booking because a toast could not render is not.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Discards every notice. Useful for tests and batch jobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _kind: NoticeKind, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<(NoticeKind, String)>>);

    impl Notifier for Recorder {
        fn notify(&self, kind: NoticeKind, message: &str) {
            self.0.lock().unwrap().push((kind, message.to_string()));
        }
    }

    #[test]
    fn test_notifier_is_object_safe() {
        let recorder = Recorder(Mutex::new(Vec::new()));
        let sink: &dyn Notifier = &recorder;
        sink.notify(NoticeKind::Success, "payment registered");

        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, NoticeKind::Success);
    }
}
