// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Services module - business logic layer.

pub mod activity;
pub mod auth;
pub mod chat;
pub mod google;
pub mod pose;
pub mod seed;

pub use activity::ActivityService;
pub use auth::{AuthService, TokenPair};
pub use chat::ChatService;
pub use google::{GoogleClient, GoogleProfile};
pub use pose::PoseService;
