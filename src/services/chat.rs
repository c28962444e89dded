// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Direct messaging between users.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::chat::{
    preview, sort_by_last_message, ContactSummary, MessageView, UserSearchHit,
};
use crate::models::User;

/// Maximum users returned by a search.
pub const SEARCH_LIMIT: i64 = 10;
/// Messages returned per conversation page.
pub const PAGE_SIZE: i64 = 50;

/// Messages in a direct conversation, oldest first.
#[derive(Debug, Clone)]
pub struct ConversationPage {
    pub conversation_id: i64,
    pub messages: Vec<MessageView>,
}

#[derive(Clone)]
pub struct ChatService {
    db: Database,
}

impl ChatService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn search(&self, user_id: i64, query: &str) -> Result<Vec<UserSearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::BadRequest("Search query is required".to_string()));
        }
        self.db.search_users(user_id, query, SEARCH_LIMIT).await
    }

    /// Contacts with their conversation state, most recent first.
    pub async fn contacts(&self, user_id: i64) -> Result<Vec<ContactSummary>> {
        let rows = self.db.list_contacts(user_id).await?;
        let mut contacts = Vec::with_capacity(rows.len());

        for row in rows {
            let contact_id = row.id;
            let mut summary = ContactSummary::without_conversation(row);

            if let Some(conversation_id) =
                self.db.find_direct_conversation(user_id, contact_id).await?
            {
                if let Some((content, created_at)) = self.db.last_message(conversation_id).await? {
                    summary.last_message = Some(preview(&content));
                    summary.last_message_time = Some(created_at);
                }
                summary.unread_count = self.db.unread_count(conversation_id, user_id).await?;
                summary.conversation_id = Some(conversation_id);
            }

            contacts.push(summary);
        }

        sort_by_last_message(&mut contacts);
        Ok(contacts)
    }

    /// Add the active user with `email` as a contact (both directions).
    pub async fn add_contact(&self, user_id: i64, email: &str) -> Result<User> {
        let contact = self
            .db
            .get_user_by_email(email)
            .await?
            .filter(|contact| contact.is_active && contact.id != user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.db.add_contact(user_id, contact.id).await?;
        Ok(contact)
    }

    /// Page of the direct conversation with `contact_id`; marks it read.
    pub async fn conversation(
        &self,
        user_id: i64,
        contact_id: i64,
        before_id: Option<i64>,
    ) -> Result<ConversationPage> {
        let contact = self.resolve_contact(user_id, contact_id).await?;
        let conversation_id = self
            .db
            .get_or_create_direct_conversation(user_id, contact.id)
            .await?;

        let messages = self
            .db
            .messages(conversation_id, before_id, PAGE_SIZE)
            .await?
            .into_iter()
            .map(|message| MessageView::for_viewer(message, user_id))
            .collect();

        self.db.mark_read(conversation_id, user_id).await?;

        Ok(ConversationPage {
            conversation_id,
            messages,
        })
    }

    /// Send a message to `contact_id`, creating the conversation if needed.
    pub async fn send(&self, user_id: i64, contact_id: i64, content: &str) -> Result<MessageView> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Message cannot be empty".to_string()));
        }

        let contact = self.resolve_contact(user_id, contact_id).await?;
        let conversation_id = self
            .db
            .get_or_create_direct_conversation(user_id, contact.id)
            .await?;

        let message = self.db.insert_message(conversation_id, user_id, content).await?;
        Ok(MessageView::for_viewer(message, user_id))
    }

    pub async fn set_presence(&self, user_id: i64, online: bool) -> Result<()> {
        self.db.set_presence(user_id, online).await
    }

    /// The other party of a direct conversation: an existing, active user
    /// who is not the caller.
    async fn resolve_contact(&self, user_id: i64, contact_id: i64) -> Result<User> {
        if contact_id == user_id {
            return Err(AppError::NotFound("Contact not found".to_string()));
        }
        self.db
            .get_user(contact_id)
            .await?
            .filter(|contact| contact.is_active)
            .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))
    }
}
