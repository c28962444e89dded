// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Direct messaging between users.

use super::User;
use serde::{Deserialize, Serialize};

/// Maximum characters of the last message shown in a contact preview.
pub const PREVIEW_CHARS: usize = 50;

/// Message joined with its sender's identity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageWithSender {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub sender_name: Option<String>,
    pub sender_email: String,
    pub content: String,
    pub created_at: String,
}

/// Contact row with presence data.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub last_seen: Option<String>,
}

impl From<User> for ContactRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            is_online: user.is_online,
            last_seen: user.last_seen,
        }
    }
}

/// Search hit, flagged when already a contact of the searcher.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct UserSearchHit {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub is_contact: bool,
}

/// Contact with the state of the direct conversation.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactSummary {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub last_seen: Option<String>,
    /// First characters of the newest message
    pub last_message: Option<String>,
    pub last_message_time: Option<String>,
    pub unread_count: i64,
    pub conversation_id: Option<i64>,
}

impl ContactSummary {
    pub fn without_conversation(contact: ContactRow) -> Self {
        Self {
            id: contact.id,
            email: contact.email,
            full_name: contact.full_name,
            avatar_url: contact.avatar_url,
            is_online: contact.is_online,
            last_seen: contact.last_seen,
            last_message: None,
            last_message_time: None,
            unread_count: 0,
            conversation_id: None,
        }
    }
}

/// Message as seen by one participant.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageView {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub sender_name: Option<String>,
    pub sender_email: String,
    pub content: String,
    pub created_at: String,
    pub is_me: bool,
}

impl MessageView {
    pub fn for_viewer(message: MessageWithSender, viewer_id: i64) -> Self {
        Self {
            is_me: message.sender_id == viewer_id,
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            sender_name: message.sender_name,
            sender_email: message.sender_email,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// Newest activity first; contacts without messages sort last.
pub fn sort_by_last_message(contacts: &mut [ContactSummary]) {
    contacts.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
}

/// Truncate message content for a contact list preview.
pub fn preview(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}

/// Escape `LIKE` wildcards so user input matches literally (escape char `\`).
pub fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
