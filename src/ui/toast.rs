//! Transient notifications for job outcomes.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastType {
    /// Warnings and errors stay up longer
    fn duration(self) -> Duration {
        match self {
            ToastType::Info | ToastType::Success => Duration::from_secs(3),
            ToastType::Warning | ToastType::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub toast_type: ToastType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
            duration: toast_type.duration(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.duration
    }
}

/// Queue of visible toasts, oldest first.
pub struct ToastManager {
    queue: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, toast_type: ToastType) {
        let toast = Toast::new(message, toast_type);
        match toast.toast_type {
            ToastType::Warning => log::warn!("{}", toast.message),
            ToastType::Error => log::error!("{}", toast.message),
            ToastType::Info | ToastType::Success => log::info!("{}", toast.message),
        }
        self.queue.push_back(toast);
        while self.queue.len() > self.max_visible {
            self.queue.pop_front();
        }
    }

    /// Remove expired toasts
    pub fn update(&mut self) {
        self.expire(Instant::now());
    }

    fn expire(&mut self, now: Instant) {
        self.queue.retain(|t| !t.is_expired(now));
    }

    pub fn visible_toasts(&self) -> Vec<&Toast> {
        self.queue.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
