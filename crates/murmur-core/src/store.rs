//! The `SocialStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `murmur-store-sqlite`). The HTTP layer (`murmur-api`) depends on this
//! abstraction, not on any concrete backend.
//!
//! `None` encodes not-found on every by-id operation; validation and
//! storage failures surface through `Self::Error`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  thought::{NewReaction, NewThought, Thought, ThoughtUpdate},
  user::{NewUser, User, UserUpdate, UserView},
};

/// Abstraction over the social-network document store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Operations that
/// touch two documents — thought creation and deletion, user deletion —
/// are atomic as a whole.
pub trait SocialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// List all users, friends and thoughts resolved to full objects.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserView>, Self::Error>> + Send + '_;

  /// Retrieve one user, resolved. `None` if the id is unknown.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<UserView>, Self::Error>> + Send + '_;

  /// Persist a new user. Fails on a malformed email, a blank username, or
  /// a username/email already in use.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Apply a partial update and return the post-update document.
  fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Delete a user and every thought they own, atomically. Returns the
  /// deleted user document.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Add `friend_id` to the user's friends set. Idempotent; no existence
  /// check is performed on `friend_id` itself.
  fn add_friend(
    &self,
    user_id: Uuid,
    friend_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserView>, Self::Error>> + Send + '_;

  /// Remove `friend_id` from the user's friends set. Removing an absent id
  /// is a no-op, not an error.
  fn remove_friend(
    &self,
    user_id: Uuid,
    friend_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserView>, Self::Error>> + Send + '_;

  // ── Thoughts ──────────────────────────────────────────────────────────

  /// List all thoughts, unfiltered.
  fn list_thoughts(
    &self,
  ) -> impl Future<Output = Result<Vec<Thought>, Self::Error>> + Send + '_;

  fn get_thought(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Thought>, Self::Error>> + Send + '_;

  /// Persist a new thought and append its id to the owner's `thoughts`
  /// list, atomically. When `user_id` names no existing user the thought
  /// is still created and no list is touched.
  fn create_thought(
    &self,
    input: NewThought,
  ) -> impl Future<Output = Result<Thought, Self::Error>> + Send + '_;

  fn update_thought(
    &self,
    id: Uuid,
    update: ThoughtUpdate,
  ) -> impl Future<Output = Result<Option<Thought>, Self::Error>> + Send + '_;

  /// Delete a thought and pull its id from the owner's `thoughts` list,
  /// atomically. Returns the deleted thought document.
  fn delete_thought(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Thought>, Self::Error>> + Send + '_;

  // ── Reactions ─────────────────────────────────────────────────────────

  /// Append a reaction and return the updated thought. No uniqueness check
  /// is performed on the reaction id.
  fn add_reaction(
    &self,
    thought_id: Uuid,
    input: NewReaction,
  ) -> impl Future<Output = Result<Option<Thought>, Self::Error>> + Send + '_;

  /// Remove every embedded reaction whose id matches, returning the
  /// updated thought. Matching nothing is a no-op, not an error.
  fn remove_reaction(
    &self,
    thought_id: Uuid,
    reaction_id: String,
  ) -> impl Future<Output = Result<Option<Thought>, Self::Error>> + Send + '_;
}
