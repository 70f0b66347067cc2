//! Integration tests for `SqliteStore`.

use std::time::Duration;

use reel_core::{
  ErrorKind, classify,
  movie::MovieFields,
  store::MovieStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore, store::DEFAULT_OP_TIMEOUT};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn fields(title: &str) -> MovieFields {
  MovieFields {
    title:       title.into(),
    description: String::new(),
    year:        2021,
    director:    "Villeneuve".into(),
    producers:   vec!["X".into()],
  }
}

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get() {
  let s = store().await;

  let movie = s.create(fields("Dune")).await.unwrap();
  assert_eq!(movie.title, "Dune");

  let fetched = s.get(movie.id).await.unwrap().unwrap();
  assert_eq!(fetched, movie);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_preserves_insertion_order() {
  let s = store().await;
  let a = s.create(fields("Arrival")).await.unwrap();
  let b = s.create(fields("Sicario")).await.unwrap();
  let c = s.create(fields("Prisoners")).await.unwrap();

  let ids: Vec<_> = s.list().await.unwrap().into_iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn producers_and_description_roundtrip() {
  let s = store().await;
  let mut input = fields("Blade Runner 2049");
  input.description = "Replicants".into();
  input.producers = vec!["Andrew A. Kosove".into(), "Broderick Johnson".into()];

  let movie = s.create(input.clone()).await.unwrap();
  let fetched = s.get(movie.id).await.unwrap().unwrap();
  assert_eq!(fetched.description, "Replicants");
  assert_eq!(fetched.producers, input.producers);
}

// ─── Uniqueness ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_title_conflicts_and_leaves_first_record() {
  let s = store().await;
  let first = s.create(fields("Dune")).await.unwrap();

  let err = s.create(fields("Dune")).await.unwrap_err();
  assert_eq!(classify(&err), ErrorKind::Conflict);

  let all = s.list().await.unwrap();
  assert_eq!(all, vec![first]);
}

#[tokio::test]
async fn update_into_other_title_conflicts() {
  let s = store().await;
  s.create(fields("Dune")).await.unwrap();
  let arrival = s.create(fields("Arrival")).await.unwrap();

  let err = s.update(arrival.id, fields("Dune")).await.unwrap_err();
  assert_eq!(classify(&err), ErrorKind::Conflict);

  let unchanged = s.get(arrival.id).await.unwrap().unwrap();
  assert_eq!(unchanged.title, "Arrival");
}

#[tokio::test]
async fn update_keeping_own_title_succeeds() {
  let s = store().await;
  let movie = s.create(fields("Dune")).await.unwrap();

  let mut replacement = fields("Dune");
  replacement.year = 2024;
  let updated = s.update(movie.id, replacement).await.unwrap();
  assert_eq!(updated.id, movie.id);
  assert_eq!(s.get(movie.id).await.unwrap().unwrap().year, 2024);
}

#[tokio::test]
async fn blank_title_is_bad_input() {
  let s = store().await;
  let err = s.create(fields("  ")).await.unwrap_err();
  assert_eq!(classify(&err), ErrorKind::BadInput);
  assert!(s.list().await.unwrap().is_empty());
}

// ─── Not found ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_missing_is_not_found() {
  let s = store().await;
  let err = s.update(Uuid::new_v4(), fields("Dune")).await.unwrap_err();
  assert_eq!(classify(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn deleted_id_stays_not_found() {
  let s = store().await;
  let movie = s.create(fields("Dune")).await.unwrap();
  s.delete(movie.id).await.unwrap();

  assert!(s.get(movie.id).await.unwrap().is_none());
  let err = s.update(movie.id, fields("Dune")).await.unwrap_err();
  assert_eq!(classify(&err), ErrorKind::NotFound);
  let err = s.delete(movie.id).await.unwrap_err();
  assert_eq!(classify(&err), ErrorKind::NotFound);

  // The title is free again, under a new id.
  let again = s.create(fields("Dune")).await.unwrap();
  assert_ne!(again.id, movie.id);
}

// ─── Durability ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn mutations_survive_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("movies.db");

  let (kept, renamed) = {
    let s = SqliteStore::open(&path, DEFAULT_OP_TIMEOUT).await.unwrap();
    let kept = s.create(fields("Dune")).await.unwrap();
    let gone = s.create(fields("Enemy")).await.unwrap();
    let renamed = s.create(fields("Incendies")).await.unwrap();
    s.delete(gone.id).await.unwrap();
    let renamed = s.update(renamed.id, fields("Polytechnique")).await.unwrap();
    (kept, renamed)
  };

  let s = SqliteStore::open(&path, DEFAULT_OP_TIMEOUT).await.unwrap();
  assert_eq!(s.list().await.unwrap(), vec![kept, renamed]);
}

#[tokio::test]
async fn concurrent_creates_with_same_title_admit_one() {
  let s = store().await;

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.create(fields("Dune")).await })
    })
    .collect();

  let mut created = 0;
  for h in handles {
    match h.await.unwrap() {
      Ok(_) => created += 1,
      Err(e) => assert_eq!(classify(&e), ErrorKind::Conflict),
    }
  }
  assert_eq!(created, 1);
  assert_eq!(s.list().await.unwrap().len(), 1);
}

// ─── Timeouts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn call_stuck_behind_busy_connection_times_out_as_internal() {
  let s = store().await;

  let busy = s.clone();
  let blocker = tokio::spawn(async move {
    busy
      .call(|_| {
        std::thread::sleep(Duration::from_millis(300));
        Ok(())
      })
      .await
  });
  tokio::time::sleep(Duration::from_millis(50)).await;

  let hurried = s.clone().with_op_timeout(Duration::from_millis(20));
  let err = hurried.create(fields("Dune")).await.unwrap_err();
  assert!(matches!(err, Error::Timeout(_)), "{err:?}");
  assert_eq!(classify(&err), ErrorKind::Internal);

  blocker.await.unwrap().unwrap();

  // The insert was already queued, so it commits once the connection is free.
  let titles: Vec<_> = s.list().await.unwrap().into_iter().map(|m| m.title).collect();
  assert_eq!(titles, vec!["Dune".to_owned()]);
}
