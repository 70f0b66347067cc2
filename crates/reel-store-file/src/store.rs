//! [`FileStore`] — an in-memory collection mirrored to a JSON file.

use std::{
  io::ErrorKind as IoErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use tokio::{
  io::AsyncWriteExt as _,
  sync::{Mutex, RwLock, oneshot},
  task::JoinError,
};
use uuid::Uuid;

use reel_core::{
  movie::{Movie, MovieFields},
  store::MovieStore,
};

use crate::{Error, Result};

/// A movie store whose canonical copy is a JSON array on disk.
///
/// Cloning is cheap — all clones share the same collection and writer lock.
#[derive(Clone)]
pub struct FileStore {
  inner: Arc<Inner>,
}

struct Inner {
  path:       PathBuf,
  op_timeout: Duration,
  /// Last durably written state. Replaced wholesale, never edited in place.
  snapshot:   RwLock<Arc<Vec<Movie>>>,
  /// Held for the whole check → mutate → persist → publish sequence.
  writer:     Mutex<()>,
}

impl FileStore {
  /// Load the collection at `path`, or start empty if the file is missing.
  pub async fn open(path: impl AsRef<Path>, op_timeout: Duration) -> Result<Self> {
    let path = path.as_ref().to_path_buf();

    let movies: Vec<Movie> = match tokio::fs::read(&path).await {
      Ok(bytes) => serde_json::from_slice(&bytes)?,
      Err(e) if e.kind() == IoErrorKind::NotFound => Vec::new(),
      Err(e) => return Err(e.into()),
    };
    tracing::debug!(path = %path.display(), count = movies.len(), "loaded movie file");

    Ok(Self {
      inner: Arc::new(Inner {
        path,
        op_timeout,
        snapshot: RwLock::new(Arc::new(movies)),
        writer: Mutex::new(()),
      }),
    })
  }

  async fn snapshot(&self) -> Arc<Vec<Movie>> { Arc::clone(&*self.inner.snapshot.read().await) }

  /// Apply `op` to a copy of the collection and make it durable.
  ///
  /// Runs on its own task so that a caller dropping this future cannot
  /// abandon a half-finished mutation while holding the writer lock. The
  /// result is sent back as soon as it is known, which on a timeout is
  /// before the file has settled.
  async fn mutate<T, F>(&self, op: F) -> Result<T>
  where
    F: FnOnce(&mut Vec<Movie>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let inner = Arc::clone(&self.inner);
    let (reply, result) = oneshot::channel();
    tokio::spawn(async move { inner.mutate(op, reply).await });
    result.await?
  }
}

impl Inner {
  async fn mutate<T, F>(&self, op: F, reply: oneshot::Sender<Result<T>>)
  where
    F: FnOnce(&mut Vec<Movie>) -> Result<T>,
  {
    let _writer = self.writer.lock().await;

    let previous = Arc::clone(&*self.snapshot.read().await);
    let mut next = Vec::clone(&previous);
    let staged = op(&mut next).and_then(|out| Ok((out, serde_json::to_vec_pretty(&next)?)));
    let (out, payload) = match staged {
      Ok(staged) => staged,
      Err(e) => {
        reply.send(Err(e)).ok();
        return;
      }
    };

    // Nothing is published unless the write lands; a failure here leaves the
    // snapshot exactly as it was.
    let mut write = tokio::spawn(write_atomically(self.path.clone(), payload));
    match tokio::time::timeout(self.op_timeout, &mut write).await {
      Ok(written) => {
        let result = settled(written).map(|()| out);
        if result.is_ok() {
          *self.snapshot.write().await = Arc::new(next);
        }
        reply.send(result).ok();
      }
      Err(_) => {
        reply.send(Err(Error::Timeout(self.op_timeout))).ok();
        // The caller saw a failure, so a write that lands late must not stay.
        if settled(write.await).is_ok() {
          self.restore(&previous, next).await;
        }
      }
    }
  }

  /// Put `previous` back on disk after a late write. If that fails as well,
  /// publish `landed` instead so memory keeps matching the file.
  async fn restore(&self, previous: &[Movie], landed: Vec<Movie>) {
    let restored = match serde_json::to_vec_pretty(previous) {
      Ok(payload) => write_atomically(self.path.clone(), payload)
        .await
        .map_err(Error::from),
      Err(e) => Err(e.into()),
    };
    match restored {
      Ok(()) => tracing::debug!(path = %self.path.display(), "rolled back late write"),
      Err(e) => {
        tracing::error!(error = %e, path = %self.path.display(), "could not roll back late write");
        *self.snapshot.write().await = Arc::new(landed);
      }
    }
  }
}

fn settled(written: std::result::Result<std::io::Result<()>, JoinError>) -> Result<()> {
  Ok(written??)
}

/// Replace `path` with `payload` via a synced temp file and a rename. The
/// temp file is gone on every return path.
async fn write_atomically(path: PathBuf, payload: Vec<u8>) -> std::io::Result<()> {
  let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

  let written = async {
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(&payload).await?;
    file.sync_all().await?;
    tokio::fs::rename(&tmp, &path).await
  }
  .await;

  if written.is_err() {
    tokio::fs::remove_file(&tmp).await.ok();
  }
  written
}

fn title_taken(movies: &[Movie], title: &str, except: Option<Uuid>) -> bool {
  movies
    .iter()
    .any(|m| m.title == title && Some(m.id) != except)
}

// ─── MovieStore impl ─────────────────────────────────────────────────────────

impl MovieStore for FileStore {
  type Error = Error;

  async fn list(&self) -> Result<Vec<Movie>> { Ok(self.snapshot().await.to_vec()) }

  async fn get(&self, id: Uuid) -> Result<Option<Movie>> {
    Ok(self.snapshot().await.iter().find(|m| m.id == id).cloned())
  }

  async fn create(&self, fields: MovieFields) -> Result<Movie> {
    fields.validate()?;

    let movie = self
      .mutate(move |movies| {
        if title_taken(movies, &fields.title, None) {
          return Err(reel_core::Error::TitleConflict(fields.title).into());
        }
        let movie = Movie::new(Uuid::new_v4(), fields);
        movies.push(movie.clone());
        Ok(movie)
      })
      .await?;

    tracing::debug!(id = %movie.id, title = %movie.title, "created movie");
    Ok(movie)
  }

  async fn update(&self, id: Uuid, fields: MovieFields) -> Result<Movie> {
    fields.validate()?;

    let movie = self
      .mutate(move |movies| {
        if !movies.iter().any(|m| m.id == id) {
          return Err(reel_core::Error::MovieNotFound(id).into());
        }
        if title_taken(movies, &fields.title, Some(id)) {
          return Err(reel_core::Error::TitleConflict(fields.title).into());
        }
        let movie = movies
          .iter_mut()
          .find(|m| m.id == id)
          .ok_or(reel_core::Error::MovieNotFound(id))?;
        movie.replace(fields);
        Ok(movie.clone())
      })
      .await?;

    tracing::debug!(%id, title = %movie.title, "updated movie");
    Ok(movie)
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    self
      .mutate(move |movies| {
        let pos = movies
          .iter()
          .position(|m| m.id == id)
          .ok_or(reel_core::Error::MovieNotFound(id))?;
        movies.remove(pos);
        Ok(())
      })
      .await?;

    tracing::debug!(%id, "deleted movie");
    Ok(())
  }
}
