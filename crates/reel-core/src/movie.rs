//! Movie — the single entity managed by the service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, Result};

/// A stored movie record.
///
/// `id` is assigned by the store on creation and never changes. `title` is
/// unique across the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  pub id:          Uuid,
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub year:        i32,
  pub director:    String,
  pub producers:   Vec<String>,
}

impl Movie {
  /// Build a record from a freshly assigned id and its fields.
  pub fn new(id: Uuid, fields: MovieFields) -> Self {
    Self {
      id,
      title: fields.title,
      description: fields.description,
      year: fields.year,
      director: fields.director,
      producers: fields.producers,
    }
  }

  /// Replace every mutable field, keeping the id.
  pub fn replace(&mut self, fields: MovieFields) {
    self.title = fields.title;
    self.description = fields.description;
    self.year = fields.year;
    self.director = fields.director;
    self.producers = fields.producers;
  }
}

/// The mutable fields of a movie, as supplied to create and update.
///
/// Updates are full replacements, so both operations take the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFields {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub year:        i32,
  pub director:    String,
  pub producers:   Vec<String>,
}

impl MovieFields {
  /// Parse and validate fields from an arbitrary JSON body.
  ///
  /// Unknown keys are ignored. Missing or wrongly-typed required fields are
  /// reported as [`Error::InvalidField`] naming the offending field.
  pub fn from_json(body: &Value) -> Result<Self> {
    let obj = body.as_object().ok_or(Error::InvalidField {
      field:  "body",
      reason: "expected a JSON object".into(),
    })?;

    let title = required_str(obj.get("title"), "title")?;
    let director = required_str(obj.get("director"), "director")?;

    let description = match obj.get("description") {
      None | Some(Value::Null) => String::new(),
      Some(Value::String(s)) => s.clone(),
      Some(_) => return Err(invalid("description", "expected a string")),
    };

    let year = match obj.get("year") {
      None | Some(Value::Null) => return Err(invalid("year", "is required")),
      Some(v) => v
        .as_i64()
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| invalid("year", "expected an integer"))?,
    };

    let producers = match obj.get("producers") {
      None | Some(Value::Null) => return Err(invalid("producers", "is required")),
      Some(Value::Array(items)) => items
        .iter()
        .map(|p| p.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| invalid("producers", "expected an array of strings"))?,
      Some(_) => return Err(invalid("producers", "expected an array of strings")),
    };

    let fields = Self { title, description, year, director, producers };
    fields.validate()?;
    Ok(fields)
  }

  /// Check the invariants that hold regardless of how the fields were built.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(invalid("title", "must not be empty"));
    }
    Ok(())
  }
}

fn invalid(field: &'static str, reason: &str) -> Error {
  Error::InvalidField { field, reason: reason.to_owned() }
}

fn required_str(value: Option<&Value>, field: &'static str) -> Result<String> {
  match value {
    None | Some(Value::Null) => Err(invalid(field, "is required")),
    Some(Value::String(s)) => Ok(s.clone()),
    Some(_) => Err(invalid(field, "expected a string")),
  }
}
