// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// How long a notification stays visible.
pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Notification>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Single-slot, self-dismissing notification.
///
/// Showing a notification aborts the dismiss timer of the one it replaces.
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    dismiss_after: Duration,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_dismiss_after(DISMISS_AFTER)
    }

    pub fn with_dismiss_after(dismiss_after: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            dismiss_after,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), NotificationKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), NotificationKind::Error);
    }

    pub fn current(&self) -> Option<Notification> {
        self.slot.lock().current.clone()
    }

    pub fn dismiss(&self) {
        let mut slot = self.slot.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        slot.current = None;
    }

    fn show(&self, message: String, kind: NotificationKind) {
        let mut slot = self.slot.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        slot.current = Some(Notification { message, kind });

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let delay = self.dismiss_after;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = shared.lock();
            // A newer notification owns the slot now.
            if slot.generation == generation {
                slot.current = None;
                slot.timer = None;
            }
        }));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(timer) = self.slot.lock().timer.take() {
            timer.abort();
        }
    }
}
