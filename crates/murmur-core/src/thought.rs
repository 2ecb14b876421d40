//! Thought documents and their embedded reactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Longest accepted thought text and reaction body, in characters.
pub const MAX_BODY_CHARS: usize = 280;

// ─── Reaction ────────────────────────────────────────────────────────────────

/// A reaction embedded in its parent thought. No independent lifecycle: it
/// is created by an add-reaction call and dies with the thought.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
  /// Opaque id; unique within the parent thought by caller convention only.
  pub reaction_id:   String,
  pub reaction_body: String,
  pub username:      String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::SocialStore::add_reaction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReaction {
  /// Generated (UUIDv4 string) when the caller does not supply one.
  pub reaction_id:   Option<String>,
  pub reaction_body: String,
  pub username:      String,
}

impl NewReaction {
  /// Check field constraints and stamp the reaction.
  pub fn into_reaction(self, created_at: DateTime<Utc>) -> Result<Reaction> {
    if self.reaction_body.is_empty()
      || self.reaction_body.chars().count() > MAX_BODY_CHARS
    {
      return Err(Error::ReactionBodyLength);
    }
    if self.username.trim().is_empty() {
      return Err(Error::EmptyUsername);
    }
    Ok(Reaction {
      reaction_id: self
        .reaction_id
        .unwrap_or_else(|| Uuid::new_v4().to_string()),
      reaction_body: self.reaction_body,
      username: self.username,
      created_at,
    })
  }
}

// ─── Thought ─────────────────────────────────────────────────────────────────

/// A thought document. `username` is a denormalized copy of the author's
/// name kept for the wire contract; integrity lookups use `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
  pub thought_id:     Uuid,
  pub thought_text:   String,
  pub username:       String,
  /// Owner reference; unset when the creating request named no existing
  /// user.
  pub user_id:        Option<Uuid>,
  pub created_at:     DateTime<Utc>,
  pub reactions:      Vec<Reaction>,
  /// Recomputed from `reactions` on every read; never stored.
  pub reaction_count: usize,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::SocialStore::create_thought`]. `user_id` names
/// the user whose `thoughts` list should receive the new id; `username` is
/// stored on the thought as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThought {
  pub thought_text: String,
  pub username:     String,
  pub user_id:      Option<Uuid>,
}

impl NewThought {
  pub fn validate(&self) -> Result<()> {
    validate_thought_text(&self.thought_text)?;
    if self.username.trim().is_empty() {
      return Err(Error::EmptyUsername);
    }
    Ok(())
  }
}

/// Partial update accepted by `PUT /thoughts/{thoughtId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtUpdate {
  pub thought_text: Option<String>,
  pub username:     Option<String>,
}

impl ThoughtUpdate {
  /// Apply this update to `thought`, re-validating every changed field.
  ///
  /// Changing `username` does not re-home the thought: the owner reference
  /// is fixed at creation.
  pub fn apply(self, thought: &mut Thought) -> Result<()> {
    if let Some(text) = self.thought_text {
      validate_thought_text(&text)?;
      thought.thought_text = text;
    }
    if let Some(username) = self.username {
      if username.trim().is_empty() {
        return Err(Error::EmptyUsername);
      }
      thought.username = username;
    }
    Ok(())
  }
}

fn validate_thought_text(text: &str) -> Result<()> {
  if text.is_empty() || text.chars().count() > MAX_BODY_CHARS {
    return Err(Error::ThoughtTextLength);
  }
  Ok(())
}
