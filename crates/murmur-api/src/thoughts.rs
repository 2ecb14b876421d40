//! Handlers for `/thoughts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/thoughts` | All thoughts, unfiltered |
//! | `GET`    | `/thoughts/:thoughtId` | 404 if not found |
//! | `POST`   | `/thoughts` | Body: [`NewThought`]; appends to the owner's list |
//! | `PUT`    | `/thoughts/:thoughtId` | Body: [`ThoughtUpdate`]; partial |
//! | `DELETE` | `/thoughts/:thoughtId` | Also pulls the id from the owner's list |
//! | `POST`   | `/thoughts/:thoughtId/reactions` | Body: [`NewReaction`] |
//! | `DELETE` | `/thoughts/:thoughtId/reactions/:reactionId` | Removes every match |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use murmur_core::{
  store::SocialStore,
  thought::{NewReaction, NewThought, Thought, ThoughtUpdate},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Collection ──────────────────────────────────────────────────────────────

/// `GET /thoughts`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Thought>>, ApiError>
where
  S: SocialStore,
{
  let thoughts = store.list_thoughts().await.map_err(ApiError::store)?;
  Ok(Json(thoughts))
}

/// `POST /thoughts` — body: `{"thoughtText": ..., "username": ..., "userId": ...}`
///
/// A `userId` that names no existing user still creates the thought; only
/// the owner-list append is skipped.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewThought>,
) -> Result<Json<Thought>, ApiError>
where
  S: SocialStore,
{
  let thought = store.create_thought(body).await.map_err(ApiError::store)?;
  Ok(Json(thought))
}

// ─── Single document ─────────────────────────────────────────────────────────

/// `GET /thoughts/:thoughtId`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Thought>, ApiError>
where
  S: SocialStore,
{
  let thought = store
    .get_thought(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ThoughtNotFound)?;
  Ok(Json(thought))
}

/// `PUT /thoughts/:thoughtId` — partial update.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ThoughtUpdate>,
) -> Result<Json<Thought>, ApiError>
where
  S: SocialStore,
{
  let thought = store
    .update_thought(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ThoughtNotFound)?;
  Ok(Json(thought))
}

/// `DELETE /thoughts/:thoughtId`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: SocialStore,
{
  store
    .delete_thought(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ThoughtNotFound)?;
  Ok(Json(json!({ "message": "Thought deleted" })))
}

// ─── Reactions ───────────────────────────────────────────────────────────────

/// `POST /thoughts/:thoughtId/reactions`
pub async fn add_reaction<S>(
  State(store): State<Arc<S>>,
  Path(thought_id): Path<Uuid>,
  Json(body): Json<NewReaction>,
) -> Result<Json<Thought>, ApiError>
where
  S: SocialStore,
{
  let thought = store
    .add_reaction(thought_id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ThoughtNotFound)?;
  Ok(Json(thought))
}

/// `DELETE /thoughts/:thoughtId/reactions/:reactionId`
pub async fn remove_reaction<S>(
  State(store): State<Arc<S>>,
  Path((thought_id, reaction_id)): Path<(Uuid, String)>,
) -> Result<Json<Thought>, ApiError>
where
  S: SocialStore,
{
  let thought = store
    .remove_reaction(thought_id, reaction_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ThoughtNotFound)?;
  Ok(Json(thought))
}
