// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
pub mod api;
pub mod config;
pub mod controller;
pub mod filter;
pub mod notification;

pub use api::{ApiClient, ApiError, ErrorKind, TaskApi};
pub use config::ClientConfig;
pub use controller::TaskController;
pub use filter::{CategoryFilter, StatusFilter, TaskFilter};
pub use notification::{Notification, NotificationKind, Notifier};
