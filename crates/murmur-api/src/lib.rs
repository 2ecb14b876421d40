//! JSON REST API for Murmur.
//!
//! Exposes an axum [`Router`] backed by any
//! [`murmur_core::store::SocialStore`]. Transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", murmur_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod thoughts;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use murmur_core::store::SocialStore;

pub use error::ApiError;


/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SocialStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{userId}",
      get(users::get_one::<S>)
        .put(users::update_one::<S>)
        .delete(users::delete_one::<S>),
    )
    .route(
      "/users/{userId}/friends/{friendId}",
      post(users::add_friend::<S>).delete(users::remove_friend::<S>),
    )
    // Thoughts
    .route(
      "/thoughts",
      get(thoughts::list::<S>).post(thoughts::create::<S>),
    )
    .route(
      "/thoughts/{thoughtId}",
      get(thoughts::get_one::<S>)
        .put(thoughts::update_one::<S>)
        .delete(thoughts::delete_one::<S>),
    )
    .route(
      "/thoughts/{thoughtId}/reactions",
      post(thoughts::add_reaction::<S>),
    )
    .route(
      "/thoughts/{thoughtId}/reactions/{reactionId}",
      delete(thoughts::remove_reaction::<S>),
    )
    .with_state(store)
}
