//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. List-valued fields (friend/thought ids,
//! embedded reactions) are stored as compact JSON arrays so SQLite's JSON1
//! functions can push and pull elements in place.

use chrono::{DateTime, Utc};
use murmur_core::{
  thought::{Reaction, Thought},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Id lists ────────────────────────────────────────────────────────────────

pub fn decode_ids(s: &str) -> Result<Vec<Uuid>> {
  let strings: Vec<String> = serde_json::from_str(s)?;
  strings.iter().map(|s| decode_uuid(s)).collect()
}

// ─── Embedded reactions ──────────────────────────────────────────────────────

pub fn encode_reaction(reaction: &Reaction) -> Result<String> {
  Ok(serde_json::to_string(reaction)?)
}

pub fn decode_reactions(s: &str) -> Result<Vec<Reaction>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub email:      String,
  pub created_at: String,
  pub thoughts:   String,
  pub friends:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      username:   self.username,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
      thoughts:   decode_ids(&self.thoughts)?,
      friends:    decode_ids(&self.friends)?,
    })
  }
}

/// Raw strings read directly from a `thoughts` row.
pub struct RawThought {
  pub thought_id:   String,
  pub thought_text: String,
  pub username:     String,
  pub user_id:      Option<String>,
  pub created_at:   String,
  pub reactions:    String,
}

impl RawThought {
  pub fn into_thought(self) -> Result<Thought> {
    let reactions = decode_reactions(&self.reactions)?;
    Ok(Thought {
      thought_id:     decode_uuid(&self.thought_id)?,
      thought_text:   self.thought_text,
      username:       self.username,
      user_id:        self.user_id.as_deref().map(decode_uuid).transpose()?,
      created_at:     decode_dt(&self.created_at)?,
      reaction_count: reactions.len(),
      reactions,
    })
  }
}
