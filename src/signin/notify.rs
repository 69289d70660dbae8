// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification and navigation sinks.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    TopCenter,
    BottomCenter,
}

/// Transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub position: ToastPosition,
}

impl Toast {
    /// Success toasts are anchored at the top of the page.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
            position: ToastPosition::TopCenter,
        }
    }

    /// Error toasts are anchored at the bottom of the page.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
            position: ToastPosition::BottomCenter,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Collects the side effects of one page request so the route can turn
/// them into a rendered page or a redirect.
#[derive(Debug, Default)]
pub struct PageEffects {
    toasts: Mutex<Vec<Toast>>,
    destination: Mutex<Option<String>>,
}

impl PageEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }

    pub fn destination(&self) -> Option<String> {
        self.destination
            .lock()
            .ok()
            .and_then(|destination| destination.clone())
    }

    pub fn into_parts(self) -> (Vec<Toast>, Option<String>) {
        let toasts = self.toasts.into_inner().unwrap_or_default();
        let destination = self.destination.into_inner().unwrap_or_default();
        (toasts, destination)
    }
}

impl Notifier for PageEffects {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

impl Navigator for PageEffects {
    fn go_to(&self, path: &str) {
        if let Ok(mut destination) = self.destination.lock() {
            if let Some(previous) = destination.as_deref() {
                tracing::warn!(previous, next = path, "Navigation target replaced");
            }
            *destination = Some(path.to_string());
        }
    }
}
