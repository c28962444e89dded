// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Contacts and direct messaging routes (authenticated).

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::chat::{ContactSummary, MessageView, UserSearchHit};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Chat routes. The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat/search", get(search_users))
        .route("/chat/contacts", get(list_contacts).post(add_contact))
        .route("/chat/conversations/{contact_id}", get(get_conversation))
        .route("/chat/conversations/{contact_id}/messages", post(send_message))
        .route("/chat/online", post(go_online))
        .route("/chat/offline", post(go_offline))
}

// ─── Request / Response Types ────────────────────────────────

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Matched against email and full name
    #[validate(length(min = 1, max = 100))]
    pub q: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddContactRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversationParams {
    /// Return messages older than this id
    pub before_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresenceResponse {
    pub status: String,
}

// ─── Handlers ────────────────────────────────────────────────

/// Search users by email or name.
#[utoipa::path(
    get,
    path = "/api/v1/chat/search",
    tag = "chat",
    security(("bearer" = [])),
    params(SearchParams),
    responses((status = 200, description = "Matching users", body = [UserSearchHit]))
)]
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UserSearchHit>>> {
    params.validate()?;
    Ok(Json(state.chat_service.search(user.user_id, &params.q).await?))
}

/// Contacts, most recently messaged first.
#[utoipa::path(
    get,
    path = "/api/v1/chat/contacts",
    tag = "chat",
    security(("bearer" = [])),
    responses((status = 200, description = "Contacts", body = [ContactSummary]))
)]
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ContactSummary>>> {
    Ok(Json(state.chat_service.contacts(user.user_id).await?))
}

/// Add a contact by email.
#[utoipa::path(
    post,
    path = "/api/v1/chat/contacts",
    tag = "chat",
    security(("bearer" = [])),
    request_body = AddContactRequest,
    responses(
        (status = 200, description = "Contact added", body = ContactSummary),
        (status = 404, description = "No such user")
    )
)]
pub async fn add_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AddContactRequest>,
) -> Result<Json<ContactSummary>> {
    req.validate()?;
    let contact = state.chat_service.add_contact(user.user_id, &req.email).await?;
    Ok(Json(ContactSummary::without_conversation(contact.into())))
}

/// Messages exchanged with a contact, oldest first. Marks the conversation read.
#[utoipa::path(
    get,
    path = "/api/v1/chat/conversations/{contact_id}",
    tag = "chat",
    security(("bearer" = [])),
    params(("contact_id" = i64, Path, description = "Other participant"), ConversationParams),
    responses(
        (status = 200, description = "Messages", body = [MessageView]),
        (status = 404, description = "No such contact")
    )
)]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<i64>,
    Query(params): Query<ConversationParams>,
) -> Result<Json<Vec<MessageView>>> {
    let page = state
        .chat_service
        .conversation(user.user_id, contact_id, params.before_id)
        .await?;
    Ok(Json(page.messages))
}

/// Send a message to a contact.
#[utoipa::path(
    post,
    path = "/api/v1/chat/conversations/{contact_id}/messages",
    tag = "chat",
    security(("bearer" = [])),
    params(("contact_id" = i64, Path, description = "Recipient")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message stored", body = MessageView),
        (status = 404, description = "No such contact")
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<MessageView>> {
    req.validate()?;
    let message = state
        .chat_service
        .send(user.user_id, contact_id, &req.content)
        .await?;
    Ok(Json(message))
}

/// Mark the caller online.
#[utoipa::path(
    post,
    path = "/api/v1/chat/online",
    tag = "chat",
    security(("bearer" = [])),
    responses((status = 200, description = "Presence updated", body = PresenceResponse))
)]
pub async fn go_online(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PresenceResponse>> {
    state.chat_service.set_presence(user.user_id, true).await?;
    Ok(Json(PresenceResponse {
        status: "online".to_string(),
    }))
}

/// Mark the caller offline.
#[utoipa::path(
    post,
    path = "/api/v1/chat/offline",
    tag = "chat",
    security(("bearer" = [])),
    responses((status = 200, description = "Presence updated", body = PresenceResponse))
)]
pub async fn go_offline(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PresenceResponse>> {
    state.chat_service.set_presence(user.user_id, false).await?;
    Ok(Json(PresenceResponse {
        status: "offline".to_string(),
    }))
}
