//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/users` | All users, friends/thoughts resolved |
//! | `GET`    | `/users/:userId` | 404 if not found |
//! | `POST`   | `/users` | Body: [`NewUser`] |
//! | `PUT`    | `/users/:userId` | Body: [`UserUpdate`]; partial |
//! | `DELETE` | `/users/:userId` | Also deletes every owned thought |
//! | `POST`   | `/users/:userId/friends/:friendId` | Idempotent |
//! | `DELETE` | `/users/:userId/friends/:friendId` | No-op when absent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use murmur_core::{
  store::SocialStore,
  user::{NewUser, User, UserUpdate, UserView},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Collection ──────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<UserView>>, ApiError>
where
  S: SocialStore,
{
  let users = store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(users))
}

/// `POST /users` — body: `{"username": ..., "email": ...}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewUser>,
) -> Result<Json<User>, ApiError>
where
  S: SocialStore,
{
  let user = store.create_user(body).await.map_err(ApiError::store)?;
  Ok(Json(user))
}

// ─── Single document ─────────────────────────────────────────────────────────

/// `GET /users/:userId`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError>
where
  S: SocialStore,
{
  let user = store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::UserNotFound)?;
  Ok(Json(user))
}

/// `PUT /users/:userId` — partial update; returns the post-update document.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UserUpdate>,
) -> Result<Json<User>, ApiError>
where
  S: SocialStore,
{
  let user = store
    .update_user(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::UserNotFound)?;
  Ok(Json(user))
}

/// `DELETE /users/:userId` — cascades to every thought the user owns.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: SocialStore,
{
  store
    .delete_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::UserNotFound)?;
  Ok(Json(json!({ "message": "User and associated thoughts deleted" })))
}

// ─── Friends ─────────────────────────────────────────────────────────────────

/// `POST /users/:userId/friends/:friendId`
pub async fn add_friend<S>(
  State(store): State<Arc<S>>,
  Path((user_id, friend_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<UserView>, ApiError>
where
  S: SocialStore,
{
  let user = store
    .add_friend(user_id, friend_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::UserNotFound)?;
  Ok(Json(user))
}

/// `DELETE /users/:userId/friends/:friendId`
pub async fn remove_friend<S>(
  State(store): State<Arc<S>>,
  Path((user_id, friend_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<UserView>, ApiError>
where
  S: SocialStore,
{
  let user = store
    .remove_friend(user_id, friend_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::UserNotFound)?;
  Ok(Json(user))
}
