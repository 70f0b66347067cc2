//! [`SqliteStore`] — the SQLite implementation of [`MovieStore`].

use std::{path::Path, time::Duration};

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use reel_core::{
  movie::{Movie, MovieFields},
  store::MovieStore,
};

use crate::{
  Error, Result,
  encode::{MOVIE_COLUMNS, RawMovie, encode_producers, encode_uuid},
  schema::SCHEMA,
};

/// Upper bound on a single database call unless configured otherwise.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// What an `INSERT` did.
enum Inserted {
  Applied,
  TitleTaken,
}

/// What an `UPDATE` did.
enum Updated {
  Applied,
  TitleTaken,
  Missing,
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A movie store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:       tokio_rusqlite::Connection,
  op_timeout: Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, op_timeout: Duration) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, op_timeout };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, op_timeout: DEFAULT_OP_TIMEOUT };
    store.init_schema().await?;
    Ok(store)
  }

  /// Bound every later call on this handle by `op_timeout`.
  pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
    self.op_timeout = op_timeout;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread, bounded by `op_timeout`.
  ///
  /// Once sent, `f` runs to completion even if this future is dropped; each
  /// closure issues at most one mutating statement, so it either commits or
  /// leaves nothing behind.
  pub(crate) async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    tokio::time::timeout(self.op_timeout, self.conn.call(f))
      .await
      .map_err(|_| Error::Timeout(self.op_timeout))?
      .map_err(Error::from)
  }
}

// ─── MovieStore impl ─────────────────────────────────────────────────────────

impl MovieStore for SqliteStore {
  type Error = Error;

  async fn list(&self) -> Result<Vec<Movie>> {
    let raws: Vec<RawMovie> = self
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawMovie::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMovie::into_movie).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<Movie>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMovie> = self
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ?1"),
            rusqlite::params![id_str],
            RawMovie::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMovie::into_movie).transpose()
  }

  async fn create(&self, fields: MovieFields) -> Result<Movie> {
    fields.validate()?;
    let movie = Movie::new(Uuid::new_v4(), fields);

    let id_str        = encode_uuid(movie.id);
    let title         = movie.title.clone();
    let description   = movie.description.clone();
    let year          = movie.year;
    let director      = movie.director.clone();
    let producers_str = encode_producers(&movie.producers)?;

    let outcome = self
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO movies (id, title, description, year, director, producers_json)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, title, description, year, director, producers_str],
        );
        match inserted {
          Ok(_) => Ok(Inserted::Applied),
          Err(e) if is_unique_violation(&e) => Ok(Inserted::TitleTaken),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Inserted::Applied => {
        tracing::debug!(id = %movie.id, title = %movie.title, "created movie");
        Ok(movie)
      }
      Inserted::TitleTaken => Err(reel_core::Error::TitleConflict(movie.title).into()),
    }
  }

  async fn update(&self, id: Uuid, fields: MovieFields) -> Result<Movie> {
    fields.validate()?;
    let movie = Movie::new(id, fields);

    let id_str        = encode_uuid(id);
    let title         = movie.title.clone();
    let description   = movie.description.clone();
    let year          = movie.year;
    let director      = movie.director.clone();
    let producers_str = encode_producers(&movie.producers)?;

    let outcome = self
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE movies
           SET title = ?2, description = ?3, year = ?4, director = ?5, producers_json = ?6
           WHERE id = ?1",
          rusqlite::params![id_str, title, description, year, director, producers_str],
        );
        match updated {
          Ok(0) => Ok(Updated::Missing),
          Ok(_) => Ok(Updated::Applied),
          Err(e) if is_unique_violation(&e) => Ok(Updated::TitleTaken),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Updated::Applied => {
        tracing::debug!(%id, title = %movie.title, "updated movie");
        Ok(movie)
      }
      Updated::Missing => Err(reel_core::Error::MovieNotFound(id).into()),
      Updated::TitleTaken => Err(reel_core::Error::TitleConflict(movie.title).into()),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let removed = self
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM movies WHERE id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    if removed == 0 {
      return Err(reel_core::Error::MovieNotFound(id).into());
    }
    tracing::debug!(%id, "deleted movie");
    Ok(())
  }
}
