//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings. Producers are stored as a
//! compact JSON array.

use reel_core::movie::Movie;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Producers ────────────────────────────────────────────────────────────────

pub fn encode_producers(producers: &[String]) -> Result<String> {
  Ok(serde_json::to_string(producers)?)
}

pub fn decode_producers(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Rows ─────────────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` over `movies`, in [`RawMovie`] order.
pub const MOVIE_COLUMNS: &str = "id, title, description, year, director, producers_json";

/// A `movies` row exactly as SQLite returns it.
pub struct RawMovie {
  pub id:             String,
  pub title:          String,
  pub description:    String,
  pub year:           i64,
  pub director:       String,
  pub producers_json: String,
}

impl RawMovie {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      title:          row.get(1)?,
      description:    row.get(2)?,
      year:           row.get(3)?,
      director:       row.get(4)?,
      producers_json: row.get(5)?,
    })
  }

  pub fn into_movie(self) -> Result<Movie> {
    Ok(Movie {
      id:          decode_uuid(&self.id)?,
      title:       self.title,
      description: self.description,
      year:        i32::try_from(self.year).map_err(|_| Error::YearOutOfRange(self.year))?,
      director:    self.director,
      producers:   decode_producers(&self.producers_json)?,
    })
  }
}
