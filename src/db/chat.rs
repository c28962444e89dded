// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Contacts, direct conversations and messages.

use super::Database;
use crate::error::AppError;
use crate::models::chat::{escape_like, ContactRow, MessageWithSender, UserSearchHit};
use crate::time_utils::now_db_timestamp;

const MESSAGE_COLUMNS: &str = "m.id, m.conversation_id, m.sender_id, u.full_name AS sender_name, \
     u.email AS sender_email, m.content, m.created_at";

/// Order-independent key identifying the direct conversation of two users.
fn direct_key(user_id: i64, other_id: i64) -> String {
    format!("{}:{}", user_id.min(other_id), user_id.max(other_id))
}

impl Database {
    // ─── Contact Operations ──────────────────────────────────────

    /// Active users other than `user_id` whose email or name contains `query`.
    pub async fn search_users(
        &self,
        user_id: i64,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserSearchHit>, AppError> {
        let pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));
        let hits = sqlx::query_as::<_, UserSearchHit>(
            "SELECT u.id, u.email, u.full_name, u.avatar_url, \
             EXISTS (SELECT 1 FROM user_contacts c WHERE c.user_id = ? AND c.contact_id = u.id) \
             AS is_contact \
             FROM users u \
             WHERE u.id != ? AND u.is_active = 1 \
             AND (LOWER(u.email) LIKE ? ESCAPE '\\' OR LOWER(u.full_name) LIKE ? ESCAPE '\\') \
             ORDER BY u.full_name, u.id LIMIT ?",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(hits)
    }

    /// Link two users as contacts in both directions. Idempotent.
    pub async fn add_contact(&self, user_id: i64, contact_id: i64) -> Result<(), AppError> {
        let now = now_db_timestamp();
        let mut tx = self.pool().begin().await?;

        for (owner, other) in [(user_id, contact_id), (contact_id, user_id)] {
            sqlx::query(
                "INSERT OR IGNORE INTO user_contacts (user_id, contact_id, created_at) \
                 VALUES (?, ?, ?)",
            )
            .bind(owner)
            .bind(other)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(user_id, contact_id, "Contact added");
        Ok(())
    }

    pub async fn list_contacts(&self, user_id: i64) -> Result<Vec<ContactRow>, AppError> {
        let contacts = sqlx::query_as::<_, ContactRow>(
            "SELECT u.id, u.email, u.full_name, u.avatar_url, u.is_online, u.last_seen \
             FROM user_contacts c JOIN users u ON u.id = c.contact_id \
             WHERE c.user_id = ? ORDER BY u.full_name, u.id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(contacts)
    }

    // ─── Conversation Operations ─────────────────────────────────

    /// Existing direct conversation between two users, if any.
    pub async fn find_direct_conversation(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> Result<Option<i64>, AppError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM conversations WHERE direct_key = ?")
                .bind(direct_key(user_id, other_id))
                .fetch_optional(self.pool())
                .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Direct conversation between two users, created on first use.
    ///
    /// The insert is the transaction's first statement, so it holds the
    /// write lock before reading anything.
    pub async fn get_or_create_direct_conversation(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> Result<i64, AppError> {
        let key = direct_key(user_id, other_id);
        let now = now_db_timestamp();
        let mut tx = self.pool().begin().await?;

        let created = sqlx::query(
            "INSERT INTO conversations (is_group, direct_key, created_at, updated_at) \
             VALUES (0, ?, ?, ?) ON CONFLICT (direct_key) DO NOTHING",
        )
        .bind(&key)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        if created.rows_affected() == 0 {
            let (id,): (i64,) =
                sqlx::query_as("SELECT id FROM conversations WHERE direct_key = ?")
                    .bind(&key)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.commit().await?;
            return Ok(id);
        }

        let conversation_id = created.last_insert_rowid();
        for participant in [user_id, other_id] {
            sqlx::query(
                "INSERT INTO conversation_participants (conversation_id, user_id, joined_at) \
                 VALUES (?, ?, ?)",
            )
            .bind(conversation_id)
            .bind(participant)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(conversation_id, user_id, other_id, "Created direct conversation");
        Ok(conversation_id)
    }

    /// Content and timestamp of the newest message in a conversation.
    pub async fn last_message(
        &self,
        conversation_id: i64,
    ) -> Result<Option<(String, String)>, AppError> {
        let row = sqlx::query_as(
            "SELECT content, created_at FROM messages WHERE conversation_id = ? \
             ORDER BY id DESC LIMIT 1",
        )
        .bind(conversation_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Messages from others that `user_id` has not read yet.
    pub async fn unread_count(&self, conversation_id: i64, user_id: i64) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages m \
             JOIN conversation_participants p \
               ON p.conversation_id = m.conversation_id AND p.user_id = ? \
             WHERE m.conversation_id = ? AND m.sender_id != ? \
             AND (p.last_read_at IS NULL OR m.created_at > p.last_read_at)",
        )
        .bind(user_id)
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;
        Ok(count)
    }

    pub async fn mark_read(&self, conversation_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE conversation_participants SET last_read_at = ? \
             WHERE conversation_id = ? AND user_id = ?",
        )
        .bind(now_db_timestamp())
        .bind(conversation_id)
        .bind(user_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    // ─── Message Operations ──────────────────────────────────────

    /// A page of messages, oldest first.
    ///
    /// Takes the `limit` newest messages with an id below `before_id`, when
    /// given.
    pub async fn messages(
        &self,
        conversation_id: i64,
        before_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError> {
        let sql = format!(
            "SELECT {} FROM messages m JOIN users u ON u.id = m.sender_id \
             WHERE m.conversation_id = ? AND (? IS NULL OR m.id < ?) \
             ORDER BY m.id DESC LIMIT ?",
            MESSAGE_COLUMNS
        );
        let mut page = sqlx::query_as::<_, MessageWithSender>(&sql)
            .bind(conversation_id)
            .bind(before_id)
            .bind(before_id)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;
        page.reverse();
        Ok(page)
    }

    /// Store a message, bump the conversation and mark it read for the sender.
    pub async fn insert_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<MessageWithSender, AppError> {
        let now = now_db_timestamp();
        let mut tx = self.pool().begin().await?;

        let message_id = sqlx::query(
            "INSERT INTO messages (conversation_id, sender_id, content, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(&now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE conversation_participants SET last_read_at = ? \
             WHERE conversation_id = ? AND user_id = ?",
        )
        .bind(&now)
        .bind(conversation_id)
        .bind(sender_id)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "SELECT {} FROM messages m JOIN users u ON u.id = m.sender_id WHERE m.id = ?",
            MESSAGE_COLUMNS
        );
        let message = sqlx::query_as::<_, MessageWithSender>(&sql)
            .bind(message_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(conversation_id, sender_id, message_id, "Message stored");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::tests::new_user;

    async fn two_users() -> (Database, i64, i64) {
        let db = Database::in_memory().await.unwrap();
        let mut ana = new_user("ana@example.com");
        ana.full_name = "Ana Runner".to_string();
        let ana = db.create_user(&ana).await.unwrap();
        let mut ben = new_user("ben@example.com");
        ben.full_name = "Ben 100%".to_string();
        let ben = db.create_user(&ben).await.unwrap();
        (db, ana.id, ben.id)
    }

    #[tokio::test]
    async fn test_search_excludes_self_and_flags_contacts() {
        let (db, ana, ben) = two_users().await;

        let hits = db.search_users(ana, "EXAMPLE", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ben);
        assert!(!hits[0].is_contact);

        db.add_contact(ana, ben).await.unwrap();
        let hits = db.search_users(ana, "ben", 10).await.unwrap();
        assert!(hits[0].is_contact);
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let (db, ana, _) = two_users().await;
        assert_eq!(db.search_users(ana, "100%", 10).await.unwrap().len(), 1);
        assert!(db.search_users(ana, "%", 10).await.unwrap().len() == 1);
        assert!(db.search_users(ana, "_na", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_contact_is_bidirectional_and_idempotent() {
        let (db, ana, ben) = two_users().await;
        db.add_contact(ana, ben).await.unwrap();
        db.add_contact(ana, ben).await.unwrap();

        let ana_contacts = db.list_contacts(ana).await.unwrap();
        let ben_contacts = db.list_contacts(ben).await.unwrap();
        assert_eq!(ana_contacts.len(), 1);
        assert_eq!(ben_contacts.len(), 1);
        assert_eq!(ben_contacts[0].id, ana);
    }

    #[tokio::test]
    async fn test_direct_conversation_reused() {
        let (db, ana, ben) = two_users().await;
        let first = db.get_or_create_direct_conversation(ana, ben).await.unwrap();
        let second = db.get_or_create_direct_conversation(ben, ana).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(db.find_direct_conversation(ana, ben).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_messages_paging_and_unread() {
        let (db, ana, ben) = two_users().await;
        let conversation = db.get_or_create_direct_conversation(ana, ben).await.unwrap();

        let mut ids = Vec::new();
        for i in 0..5 {
            let message = db
                .insert_message(conversation, ana, &format!("msg {}", i))
                .await
                .unwrap();
            ids.push(message.id);
        }

        assert_eq!(db.unread_count(conversation, ben).await.unwrap(), 5);
        assert_eq!(db.unread_count(conversation, ana).await.unwrap(), 0);

        let page = db.messages(conversation, None, 3).await.unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["msg 2", "msg 3", "msg 4"]);

        let older = db.messages(conversation, Some(ids[2]), 50).await.unwrap();
        assert_eq!(older.len(), 2);
        assert_eq!(older[0].content, "msg 0");
        assert_eq!(older[0].sender_name.as_deref(), Some("Ana Runner"));

        db.mark_read(conversation, ben).await.unwrap();
        assert_eq!(db.unread_count(conversation, ben).await.unwrap(), 0);

        let last = db.last_message(conversation).await.unwrap().unwrap();
        assert_eq!(last.0, "msg 4");
    }
}
