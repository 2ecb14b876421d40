//! [`SqliteStore`] — the SQLite implementation of [`SocialStore`].
//!
//! Array-valued document fields live in JSON columns; pushes and pulls go
//! through SQLite's JSON1 functions so each list mutation is a single
//! UPDATE. Operations that touch two documents (thought creation and
//! deletion, user deletion) run inside one transaction.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use murmur_core::{
  store::SocialStore,
  thought::{NewReaction, NewThought, Thought, ThoughtUpdate},
  user::{NewUser, User, UserUpdate, UserView},
};

use crate::{
  Error, Result,
  encode::{RawThought, RawUser, encode_dt, encode_reaction, encode_uuid},
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    username:   row.get(1)?,
    email:      row.get(2)?,
    created_at: row.get(3)?,
    thoughts:   row.get(4)?,
    friends:    row.get(5)?,
  })
}

fn thought_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawThought> {
  Ok(RawThought {
    thought_id:   row.get(0)?,
    thought_text: row.get(1)?,
    username:     row.get(2)?,
    user_id:      row.get(3)?,
    created_at:   row.get(4)?,
    reactions:    row.get(5)?,
  })
}

/// Map UNIQUE-constraint failures on `users` to [`Error::DuplicateUser`].
fn duplicate_or_db(err: tokio_rusqlite::Error) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) =
    &err
    && e.code == rusqlite::ErrorCode::ConstraintViolation
  {
    return Error::DuplicateUser;
  }
  Error::Database(err)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Murmur store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a user document (id lists unresolved).
  async fn user_doc(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, username, email, created_at, thoughts, friends
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Fetch a thought document.
  async fn thought_doc(&self, id: Uuid) -> Result<Option<Thought>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawThought> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT thought_id, thought_text, username, user_id, created_at, reactions
               FROM thoughts WHERE thought_id = ?1",
              rusqlite::params![id_str],
              thought_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawThought::into_thought).transpose()
  }

  /// Resolve a user document into its read model: fetch every referenced
  /// friend and thought. Ids that no longer resolve are skipped.
  async fn resolve(&self, user: User) -> Result<UserView> {
    let friend_ids: Vec<String> =
      user.friends.iter().copied().map(encode_uuid).collect();
    let thought_ids: Vec<String> =
      user.thoughts.iter().copied().map(encode_uuid).collect();

    let (raw_friends, raw_thoughts): (Vec<RawUser>, Vec<RawThought>) = self
      .conn
      .call(move |conn| {
        let mut friends = Vec::with_capacity(friend_ids.len());
        {
          let mut stmt = conn.prepare(
            "SELECT user_id, username, email, created_at, thoughts, friends
             FROM users WHERE user_id = ?1",
          )?;
          for id in &friend_ids {
            if let Some(raw) = stmt
              .query_row(rusqlite::params![id], user_from_row)
              .optional()?
            {
              friends.push(raw);
            }
          }
        }

        let mut thoughts = Vec::with_capacity(thought_ids.len());
        {
          let mut stmt = conn.prepare(
            "SELECT thought_id, thought_text, username, user_id, created_at, reactions
             FROM thoughts WHERE thought_id = ?1",
          )?;
          for id in &thought_ids {
            if let Some(raw) = stmt
              .query_row(rusqlite::params![id], thought_from_row)
              .optional()?
            {
              thoughts.push(raw);
            }
          }
        }

        Ok((friends, thoughts))
      })
      .await?;

    let friends = raw_friends
      .into_iter()
      .map(RawUser::into_user)
      .collect::<Result<Vec<_>>>()?;
    let thoughts = raw_thoughts
      .into_iter()
      .map(RawThought::into_thought)
      .collect::<Result<Vec<_>>>()?;

    Ok(UserView::resolve(user, friends, thoughts))
  }
}

// ─── SocialStore impl ────────────────────────────────────────────────────────

impl SocialStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn list_users(&self) -> Result<Vec<UserView>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, username, email, created_at, thoughts, friends
           FROM users",
        )?;
        let rows = stmt
          .query_map([], user_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let users = raws
      .into_iter()
      .map(RawUser::into_user)
      .collect::<Result<Vec<_>>>()?;

    let mut views = Vec::with_capacity(users.len());
    for user in users {
      views.push(self.resolve(user).await?);
    }
    Ok(views)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<UserView>> {
    match self.user_doc(id).await? {
      Some(user) => Ok(Some(self.resolve(user).await?)),
      None => Ok(None),
    }
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let input = input.normalized()?;
    let user = User {
      user_id:    Uuid::new_v4(),
      username:   input.username,
      email:      input.email,
      created_at: Utc::now(),
      thoughts:   Vec::new(),
      friends:    Vec::new(),
    };

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let email    = user.email.clone();
    let at_str   = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, email, created_at, thoughts, friends)
           VALUES (?1, ?2, ?3, ?4, '[]', '[]')",
          rusqlite::params![id_str, username, email, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(duplicate_or_db)?;

    Ok(user)
  }

  async fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> Result<Option<User>> {
    let Some(mut user) = self.user_doc(id).await? else {
      return Ok(None);
    };
    update.apply(&mut user)?;

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let email    = user.email.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET username = ?2, email = ?3 WHERE user_id = ?1",
          rusqlite::params![id_str, username, email],
        )?;
        Ok(())
      })
      .await
      .map_err(duplicate_or_db)?;

    Ok(Some(user))
  }

  async fn delete_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = tx
          .query_row(
            "SELECT user_id, username, email, created_at, thoughts, friends
             FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            user_from_row,
          )
          .optional()?
        else {
          return Ok(None);
        };

        // Owned thoughts go first so the owner reference never dangles.
        tx.execute(
          "DELETE FROM thoughts WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn add_friend(
    &self,
    user_id: Uuid,
    friend_id: Uuid,
  ) -> Result<Option<UserView>> {
    let id_str     = encode_uuid(user_id);
    let friend_str = encode_uuid(friend_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        // Append only when absent: set semantics, no duplicate error.
        conn.execute(
          "UPDATE users
           SET friends = json_insert(friends, '$[#]', ?2)
           WHERE user_id = ?1
             AND NOT EXISTS (SELECT 1 FROM json_each(users.friends)
                             WHERE value = ?2)",
          rusqlite::params![id_str, friend_str],
        )?;

        Ok(
          conn
            .query_row(
              "SELECT user_id, username, email, created_at, thoughts, friends
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    match raw.map(RawUser::into_user).transpose()? {
      Some(user) => Ok(Some(self.resolve(user).await?)),
      None => Ok(None),
    }
  }

  async fn remove_friend(
    &self,
    user_id: Uuid,
    friend_id: Uuid,
  ) -> Result<Option<UserView>> {
    let id_str     = encode_uuid(user_id);
    let friend_str = encode_uuid(friend_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users
           SET friends = (SELECT json_group_array(value)
                          FROM json_each(users.friends)
                          WHERE value <> ?2)
           WHERE user_id = ?1",
          rusqlite::params![id_str, friend_str],
        )?;

        Ok(
          conn
            .query_row(
              "SELECT user_id, username, email, created_at, thoughts, friends
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    match raw.map(RawUser::into_user).transpose()? {
      Some(user) => Ok(Some(self.resolve(user).await?)),
      None => Ok(None),
    }
  }

  // ── Thoughts ──────────────────────────────────────────────────────────────

  async fn list_thoughts(&self) -> Result<Vec<Thought>> {
    let raws: Vec<RawThought> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT thought_id, thought_text, username, user_id, created_at, reactions
           FROM thoughts",
        )?;
        let rows = stmt
          .query_map([], thought_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawThought::into_thought).collect()
  }

  async fn get_thought(&self, id: Uuid) -> Result<Option<Thought>> {
    self.thought_doc(id).await
  }

  async fn create_thought(&self, input: NewThought) -> Result<Thought> {
    input.validate()?;
    let NewThought { thought_text, username, user_id: owner_id } = input;

    let mut thought = Thought {
      thought_id:     Uuid::new_v4(),
      thought_text,
      username,
      user_id:        None,
      created_at:     Utc::now(),
      reactions:      Vec::new(),
      reaction_count: 0,
    };

    let id_str    = encode_uuid(thought.thought_id);
    let text      = thought.thought_text.clone();
    let username  = thought.username.clone();
    let at_str    = encode_dt(thought.created_at);
    let owner_str = owner_id.map(encode_uuid);

    let linked: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // The owner link is only recorded when the user actually exists;
        // an unknown id still yields a stored thought, owner unset.
        let owner: Option<String> = match owner_str {
          Some(candidate) => tx
            .query_row(
              "SELECT user_id FROM users WHERE user_id = ?1",
              rusqlite::params![candidate],
              |row| row.get(0),
            )
            .optional()?,
          None => None,
        };

        tx.execute(
          "INSERT INTO thoughts
             (thought_id, thought_text, username, user_id, created_at, reactions)
           VALUES (?1, ?2, ?3, ?4, ?5, '[]')",
          rusqlite::params![id_str, text, username, owner, at_str],
        )?;

        if let Some(owner) = &owner {
          tx.execute(
            "UPDATE users
             SET thoughts = json_insert(thoughts, '$[#]', ?2)
             WHERE user_id = ?1",
            rusqlite::params![owner, id_str],
          )?;
        }

        tx.commit()?;
        Ok(owner.is_some())
      })
      .await?;

    if linked {
      thought.user_id = owner_id;
    }
    Ok(thought)
  }

  async fn update_thought(
    &self,
    id: Uuid,
    update: ThoughtUpdate,
  ) -> Result<Option<Thought>> {
    let Some(mut thought) = self.thought_doc(id).await? else {
      return Ok(None);
    };
    update.apply(&mut thought)?;

    let id_str   = encode_uuid(thought.thought_id);
    let text     = thought.thought_text.clone();
    let username = thought.username.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE thoughts SET thought_text = ?2, username = ?3
           WHERE thought_id = ?1",
          rusqlite::params![id_str, text, username],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(thought))
  }

  async fn delete_thought(&self, id: Uuid) -> Result<Option<Thought>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawThought> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = tx
          .query_row(
            "SELECT thought_id, thought_text, username, user_id, created_at, reactions
             FROM thoughts WHERE thought_id = ?1",
            rusqlite::params![id_str],
            thought_from_row,
          )
          .optional()?
        else {
          return Ok(None);
        };

        tx.execute(
          "DELETE FROM thoughts WHERE thought_id = ?1",
          rusqlite::params![id_str],
        )?;

        // Pull the id from the owner's list; orphans have no owner to fix.
        if let Some(owner) = &raw.user_id {
          tx.execute(
            "UPDATE users
             SET thoughts = (SELECT json_group_array(value)
                             FROM json_each(users.thoughts)
                             WHERE value <> ?2)
             WHERE user_id = ?1",
            rusqlite::params![owner, id_str],
          )?;
        }

        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawThought::into_thought).transpose()
  }

  // ── Reactions ─────────────────────────────────────────────────────────────

  async fn add_reaction(
    &self,
    thought_id: Uuid,
    input: NewReaction,
  ) -> Result<Option<Thought>> {
    let reaction     = input.into_reaction(Utc::now())?;
    let id_str       = encode_uuid(thought_id);
    let reaction_str = encode_reaction(&reaction)?;

    let updated: bool = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE thoughts
           SET reactions = json_insert(reactions, '$[#]', json(?2))
           WHERE thought_id = ?1",
          rusqlite::params![id_str, reaction_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !updated {
      return Ok(None);
    }
    self.thought_doc(thought_id).await
  }

  async fn remove_reaction(
    &self,
    thought_id: Uuid,
    reaction_id: String,
  ) -> Result<Option<Thought>> {
    let id_str = encode_uuid(thought_id);

    let updated: bool = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE thoughts
           SET reactions = (SELECT json_group_array(json(value))
                            FROM json_each(thoughts.reactions)
                            WHERE json_extract(value, '$.reactionId') <> ?2)
           WHERE thought_id = ?1",
          rusqlite::params![id_str, reaction_id],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !updated {
      return Ok(None);
    }
    self.thought_doc(thought_id).await
  }
}
