//! Author model and registry.
//!
//! # Responsibility
//! - Define the collaborator record shared by listing and rendering flows.
//! - Guard the registry uniqueness rules on insertion.
//!
//! # Invariants
//! - No two registry entries share `id`, `name` or `email`.
//! - Insertion order is preserved and is the display order.
//! - A rejected insertion leaves the registry untouched.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Reserved id bound to the ambient user at first-time initialization.
pub const SELF_AUTHOR_ID: &str = "self";

/// One collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Short lookup token, e.g. `self` or `bob`.
    pub id: String,
    pub name: String,
    /// Sole field used when matching an identity against the registry.
    pub email: String,
}

impl Author {
    /// Builds an author without validation.
    ///
    /// Uniqueness is checked by [`AuthorRegistry::add`], not here.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns `Name <email>`, the form used in listings and trailers.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Identity comparison; only the email is significant.
    pub fn same_identity(&self, other: &Author) -> bool {
        self.email == other.email
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Field that collided on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Id,
    Name,
    Email,
}

impl DuplicateField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
        }
    }
}

impl Display for DuplicateField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected registry insertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("author with {field} {value} already exists")]
pub struct DuplicateError {
    pub field: DuplicateField,
    pub value: String,
}

/// Ordered, uniqueness-constrained collection of authors.
///
/// Deserialization does not re-check uniqueness; a hand-edited file is
/// returned as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorRegistry {
    authors: Vec<Author>,
}

impl AuthorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only `author`.
    pub(crate) fn single(author: Author) -> Self {
        Self {
            authors: vec![author],
        }
    }

    /// Appends a new author unless `id`, `name` or `email` is already taken.
    ///
    /// Every existing entry is checked in order, and within one entry the
    /// fields are compared as `id`, then `name`, then `email`. The first
    /// collision found is reported.
    pub fn add(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<(), DuplicateError> {
        let candidate = Author::new(id, name, email);
        if let Some(err) = self.first_collision(&candidate) {
            return Err(err);
        }
        self.authors.push(candidate);
        Ok(())
    }

    /// Returns the author with the given id.
    pub fn find(&self, id: &str) -> Option<&Author> {
        self.authors.iter().find(|author| author.id == id)
    }

    /// Returns the author with the given email.
    pub fn find_by_email(&self, email: &str) -> Option<&Author> {
        self.authors.iter().find(|author| author.email == email)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Author> {
        self.authors.iter()
    }

    pub fn as_slice(&self) -> &[Author] {
        &self.authors
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    fn first_collision(&self, candidate: &Author) -> Option<DuplicateError> {
        self.authors.iter().find_map(|existing| {
            let field = if existing.id == candidate.id {
                DuplicateField::Id
            } else if existing.name == candidate.name {
                DuplicateField::Name
            } else if existing.same_identity(candidate) {
                DuplicateField::Email
            } else {
                return None;
            };
            let value = match field {
                DuplicateField::Id => candidate.id.clone(),
                DuplicateField::Name => candidate.name.clone(),
                DuplicateField::Email => candidate.email.clone(),
            };
            Some(DuplicateError { field, value })
        })
    }
}

impl<'a> IntoIterator for &'a AuthorRegistry {
    type Item = &'a Author;
    type IntoIter = std::slice::Iter<'a, Author>;

    fn into_iter(self) -> Self::IntoIter {
        self.authors.iter()
    }
}
