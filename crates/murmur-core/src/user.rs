//! User documents and their derived read model.
//!
//! A user row stores its relations as id lists (`thoughts` back-references,
//! `friends`). Reads resolve those ids into full objects via [`UserView`];
//! nothing derived is ever written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, thought::Thought};

// ─── User ────────────────────────────────────────────────────────────────────

/// A user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub user_id:    Uuid,
  pub username:   String,
  pub email:      String,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
  /// Ids of thoughts posted by this user, in creation order.
  pub thoughts:   Vec<Uuid>,
  /// Ids of befriended users. Set semantics; no symmetry enforced — adding
  /// A→B does not add B→A.
  pub friends:    Vec<Uuid>,
}

// ─── UserView ────────────────────────────────────────────────────────────────

/// The resolved read model for a user — never stored, always derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
  pub user_id:      Uuid,
  pub username:     String,
  pub email:        String,
  pub created_at:   DateTime<Utc>,
  pub thoughts:     Vec<Thought>,
  pub friends:      Vec<User>,
  /// Recomputed from the stored friends list on every read.
  pub friend_count: usize,
}

impl UserView {
  /// Assemble a view from a user document and its resolved references.
  ///
  /// A dangling reference (a friend deleted since it was linked) is simply
  /// absent from the resolved list; `friend_count` still reports the
  /// stored-list length.
  pub fn resolve(
    user: User,
    friends: Vec<User>,
    thoughts: Vec<Thought>,
  ) -> Self {
    Self {
      friend_count: user.friends.len(),
      user_id:      user.user_id,
      username:     user.username,
      email:        user.email,
      created_at:   user.created_at,
      thoughts,
      friends,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::SocialStore::create_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub username: String,
  pub email:    String,
}

impl NewUser {
  /// Trim the username and check field constraints.
  pub fn normalized(self) -> Result<Self> {
    let username = normalize_username(&self.username)?;
    if !valid_email(&self.email) {
      return Err(Error::InvalidEmail(self.email));
    }
    Ok(Self { username, email: self.email })
  }
}

/// Partial update accepted by `PUT /users/{userId}`. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
  pub username: Option<String>,
  pub email:    Option<String>,
}

impl UserUpdate {
  /// Apply this update to `user`, re-validating every changed field.
  pub fn apply(self, user: &mut User) -> Result<()> {
    if let Some(username) = self.username {
      user.username = normalize_username(&username)?;
    }
    if let Some(email) = self.email {
      if !valid_email(&email) {
        return Err(Error::InvalidEmail(email));
      }
      user.email = email;
    }
    Ok(())
  }
}

// ─── Field constraints ───────────────────────────────────────────────────────

fn normalize_username(raw: &str) -> Result<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(Error::EmptyUsername);
  }
  Ok(trimmed.to_owned())
}

/// Basic `local@domain.tld` shape check: a non-empty local part, one `@`,
/// and a domain whose last `.` separates non-empty labels.
fn valid_email(address: &str) -> bool {
  let Some((local, domain)) = address.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
    None => false,
  }
}
