//! Integration tests for `SqliteStore` against an in-memory database.

use murmur_core::{
  store::SocialStore,
  thought::{NewReaction, NewThought, ThoughtUpdate},
  user::{NewUser, UserUpdate},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn user_input(username: &str) -> NewUser {
  NewUser {
    username: username.into(),
    email:    format!("{username}@example.com"),
  }
}

fn thought_input(username: &str, owner: Option<Uuid>) -> NewThought {
  NewThought {
    thought_text: format!("a thought from {username}"),
    username:     username.into(),
    user_id:      owner,
  }
}

fn reaction_input(id: Option<&str>) -> NewReaction {
  NewReaction {
    reaction_id:   id.map(str::to_owned),
    reaction_body: "nice".into(),
    username:      "bob".into(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s.create_user(user_input("amy")).await.unwrap();
  assert_eq!(user.username, "amy");
  assert!(user.thoughts.is_empty());
  assert!(user.friends.is_empty());

  let view = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(view.user_id, user.user_id);
  assert_eq!(view.email, "amy@example.com");
  assert_eq!(view.friend_count, 0);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  let result = s.get_user(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_users_returns_all() {
  let s = store().await;
  s.create_user(user_input("amy")).await.unwrap();
  s.create_user(user_input("bob")).await.unwrap();

  let all = s.list_users().await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn duplicate_username_rejected() {
  let s = store().await;
  s.create_user(user_input("amy")).await.unwrap();

  let err = s
    .create_user(NewUser {
      username: "amy".into(),
      email:    "other@example.com".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateUser));

  // No second document was created.
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_email_rejected() {
  let s = store().await;
  s.create_user(user_input("amy")).await.unwrap();

  let err = s
    .create_user(NewUser {
      username: "amy2".into(),
      email:    "amy@example.com".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateUser));
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_email_rejected() {
  let s = store().await;
  let err = s
    .create_user(NewUser {
      username: "amy".into(),
      email:    "not-an-email".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(murmur_core::Error::InvalidEmail(_))
  ));
  assert!(s.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn username_stored_trimmed() {
  let s = store().await;
  let user = s
    .create_user(NewUser {
      username: "  amy  ".into(),
      email:    "amy@example.com".into(),
    })
    .await
    .unwrap();
  assert_eq!(user.username, "amy");
}

#[tokio::test]
async fn update_user_partial_fields() {
  let s = store().await;
  let user = s.create_user(user_input("amy")).await.unwrap();

  let updated = s
    .update_user(user.user_id, UserUpdate {
      email:    Some("amy@new.example.com".into()),
      username: None,
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.username, "amy");
  assert_eq!(updated.email, "amy@new.example.com");
}

#[tokio::test]
async fn update_user_missing_returns_none() {
  let s = store().await;
  let result = s
    .update_user(Uuid::new_v4(), UserUpdate::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn update_user_to_taken_username_rejected() {
  let s = store().await;
  s.create_user(user_input("amy")).await.unwrap();
  let bob = s.create_user(user_input("bob")).await.unwrap();

  let err = s
    .update_user(bob.user_id, UserUpdate {
      username: Some("amy".into()),
      email:    None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateUser));
}

// ─── Friends ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_friend_appears_in_view() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let bob = s.create_user(user_input("bob")).await.unwrap();

  let view = s.add_friend(amy.user_id, bob.user_id).await.unwrap().unwrap();
  assert_eq!(view.friend_count, 1);
  assert_eq!(view.friends.len(), 1);
  assert_eq!(view.friends[0].user_id, bob.user_id);

  // One-directional: bob gained nothing.
  let bob_view = s.get_user(bob.user_id).await.unwrap().unwrap();
  assert_eq!(bob_view.friend_count, 0);
}

#[tokio::test]
async fn add_friend_twice_keeps_one_copy() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let bob = s.create_user(user_input("bob")).await.unwrap();

  s.add_friend(amy.user_id, bob.user_id).await.unwrap();
  let view = s.add_friend(amy.user_id, bob.user_id).await.unwrap().unwrap();

  assert_eq!(view.friend_count, 1);
  assert_eq!(view.friends.len(), 1);
}

#[tokio::test]
async fn add_friend_missing_user_returns_none() {
  let s = store().await;
  let result = s.add_friend(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn remove_absent_friend_is_noop() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let bob = s.create_user(user_input("bob")).await.unwrap();
  s.add_friend(amy.user_id, bob.user_id).await.unwrap();

  let view = s
    .remove_friend(amy.user_id, Uuid::new_v4())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(view.friend_count, 1);
}

#[tokio::test]
async fn remove_friend_round_trip() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let bob = s.create_user(user_input("bob")).await.unwrap();

  s.add_friend(amy.user_id, bob.user_id).await.unwrap();
  let view = s
    .remove_friend(amy.user_id, bob.user_id)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(view.friend_count, 0);
  assert!(view.friends.is_empty());
}

// ─── Thoughts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_thought_links_owner() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();

  let thought = s
    .create_thought(thought_input("amy", Some(amy.user_id)))
    .await
    .unwrap();
  assert_eq!(thought.user_id, Some(amy.user_id));

  let view = s.get_user(amy.user_id).await.unwrap().unwrap();
  let ids: Vec<_> = view.thoughts.iter().map(|t| t.thought_id).collect();
  assert_eq!(ids, vec![thought.thought_id]);
}

#[tokio::test]
async fn create_thought_unknown_owner_still_created() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();

  let thought = s
    .create_thought(thought_input("amy", Some(Uuid::new_v4())))
    .await
    .unwrap();
  assert_eq!(thought.user_id, None);

  // The thought exists, but nobody's list was touched.
  assert!(s.get_thought(thought.thought_id).await.unwrap().is_some());
  let view = s.get_user(amy.user_id).await.unwrap().unwrap();
  assert!(view.thoughts.is_empty());
}

#[tokio::test]
async fn get_thought_missing_returns_none() {
  let s = store().await;
  assert!(s.get_thought(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_thoughts_returns_all() {
  let s = store().await;
  s.create_thought(thought_input("amy", None)).await.unwrap();
  s.create_thought(thought_input("bob", None)).await.unwrap();

  assert_eq!(s.list_thoughts().await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_thought_partial_fields() {
  let s = store().await;
  let thought = s.create_thought(thought_input("amy", None)).await.unwrap();

  let updated = s
    .update_thought(thought.thought_id, ThoughtUpdate {
      thought_text: Some("edited".into()),
      username:     None,
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.thought_text, "edited");
  assert_eq!(updated.username, "amy");
}

#[tokio::test]
async fn update_thought_missing_returns_none() {
  let s = store().await;
  let result = s
    .update_thought(Uuid::new_v4(), ThoughtUpdate::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_thought_pulls_owner_list() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let keep = s
    .create_thought(thought_input("amy", Some(amy.user_id)))
    .await
    .unwrap();
  let gone = s
    .create_thought(thought_input("amy", Some(amy.user_id)))
    .await
    .unwrap();

  let deleted = s.delete_thought(gone.thought_id).await.unwrap().unwrap();
  assert_eq!(deleted.thought_id, gone.thought_id);

  let view = s.get_user(amy.user_id).await.unwrap().unwrap();
  let ids: Vec<_> = view.thoughts.iter().map(|t| t.thought_id).collect();
  assert_eq!(ids, vec![keep.thought_id]);
}

#[tokio::test]
async fn delete_thought_survives_owner_rename() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let thought = s
    .create_thought(thought_input("amy", Some(amy.user_id)))
    .await
    .unwrap();

  // The pull matches on owner id, so renaming the user changes nothing.
  s.update_user(amy.user_id, UserUpdate {
    username: Some("amelia".into()),
    email:    None,
  })
  .await
  .unwrap();

  s.delete_thought(thought.thought_id).await.unwrap().unwrap();
  let view = s.get_user(amy.user_id).await.unwrap().unwrap();
  assert!(view.thoughts.is_empty());
}

#[tokio::test]
async fn delete_thought_missing_returns_none() {
  let s = store().await;
  assert!(s.delete_thought(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── User deletion cascade ───────────────────────────────────────────────────

#[tokio::test]
async fn delete_user_cascades_owned_thoughts() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let bob = s.create_user(user_input("bob")).await.unwrap();

  let t1 = s
    .create_thought(thought_input("amy", Some(amy.user_id)))
    .await
    .unwrap();
  let t2 = s
    .create_thought(thought_input("amy", Some(amy.user_id)))
    .await
    .unwrap();
  let bobs = s
    .create_thought(thought_input("bob", Some(bob.user_id)))
    .await
    .unwrap();

  let deleted = s.delete_user(amy.user_id).await.unwrap().unwrap();
  assert_eq!(deleted.user_id, amy.user_id);

  assert!(s.get_user(amy.user_id).await.unwrap().is_none());
  assert!(s.get_thought(t1.thought_id).await.unwrap().is_none());
  assert!(s.get_thought(t2.thought_id).await.unwrap().is_none());
  assert!(s.get_thought(bobs.thought_id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_user_cascade_survives_rename() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();
  let thought = s
    .create_thought(thought_input("amy", Some(amy.user_id)))
    .await
    .unwrap();

  s.update_user(amy.user_id, UserUpdate {
    username: Some("amelia".into()),
    email:    None,
  })
  .await
  .unwrap();

  s.delete_user(amy.user_id).await.unwrap().unwrap();
  assert!(s.get_thought(thought.thought_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_user_missing_returns_none() {
  let s = store().await;
  assert!(s.delete_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_user_keeps_orphan_thoughts() {
  let s = store().await;
  let amy = s.create_user(user_input("amy")).await.unwrap();

  // Same username on the wire, but never linked to amy's document.
  let orphan = s.create_thought(thought_input("amy", None)).await.unwrap();

  s.delete_user(amy.user_id).await.unwrap().unwrap();
  assert!(s.get_thought(orphan.thought_id).await.unwrap().is_some());
}

// ─── Reactions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_remove_reaction() {
  let s = store().await;
  let thought = s.create_thought(thought_input("amy", None)).await.unwrap();

  let updated = s
    .add_reaction(thought.thought_id, reaction_input(Some("r1")))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.reactions.len(), 1);
  assert_eq!(updated.reaction_count, 1);
  assert_eq!(updated.reactions[0].reaction_id, "r1");

  let updated = s
    .remove_reaction(thought.thought_id, "r1".into())
    .await
    .unwrap()
    .unwrap();
  assert!(updated.reactions.is_empty());
  assert_eq!(updated.reaction_count, 0);
}

#[tokio::test]
async fn remove_reaction_again_is_noop() {
  let s = store().await;
  let thought = s.create_thought(thought_input("amy", None)).await.unwrap();

  s.add_reaction(thought.thought_id, reaction_input(Some("r1")))
    .await
    .unwrap();
  s.remove_reaction(thought.thought_id, "r1".into())
    .await
    .unwrap();

  // Second removal matches nothing; still a success.
  let updated = s
    .remove_reaction(thought.thought_id, "r1".into())
    .await
    .unwrap()
    .unwrap();
  assert!(updated.reactions.is_empty());
}

#[tokio::test]
async fn remove_reaction_matches_every_copy() {
  let s = store().await;
  let thought = s.create_thought(thought_input("amy", None)).await.unwrap();

  // Caller-supplied ids are not checked for uniqueness.
  s.add_reaction(thought.thought_id, reaction_input(Some("r1")))
    .await
    .unwrap();
  s.add_reaction(thought.thought_id, reaction_input(Some("r1")))
    .await
    .unwrap();
  s.add_reaction(thought.thought_id, reaction_input(Some("r2")))
    .await
    .unwrap();

  let updated = s
    .remove_reaction(thought.thought_id, "r1".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.reactions.len(), 1);
  assert_eq!(updated.reactions[0].reaction_id, "r2");
}

#[tokio::test]
async fn add_reaction_missing_thought_returns_none() {
  let s = store().await;
  let result = s
    .add_reaction(Uuid::new_v4(), reaction_input(None))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn reactions_survive_round_trip() {
  let s = store().await;
  let thought = s.create_thought(thought_input("amy", None)).await.unwrap();

  s.add_reaction(thought.thought_id, reaction_input(None))
    .await
    .unwrap();

  let fetched = s.get_thought(thought.thought_id).await.unwrap().unwrap();
  assert_eq!(fetched.reactions.len(), 1);
  assert_eq!(fetched.reactions[0].reaction_body, "nice");
  assert_eq!(fetched.reactions[0].username, "bob");
  assert!(!fetched.reactions[0].reaction_id.is_empty());
}
