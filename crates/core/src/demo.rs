//! The `Demo` entity: one store-assigned id plus one free-text field.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::DemoId;

/// A demo row.
///
/// `id` is `None` until the first save; the store assigns it and it never
/// changes afterwards. `demofield` accepts any string (or none at all).
///
/// Equality is identity-based: two demos are equal only when both carry an
/// id and the ids match. A demo without an id equals nothing but itself
/// (same reference), so `Demo` is deliberately not `Eq` or `Hash`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demo {
    #[serde(default)]
    id: Option<DemoId>,
    #[serde(default)]
    demofield: Option<String>,
}

impl Demo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for `demofield`.
    pub fn with_demofield(mut self, demofield: impl Into<String>) -> Self {
        self.demofield = Some(demofield.into());
        self
    }

    pub fn id(&self) -> Option<DemoId> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<DemoId>) {
        self.id = id;
    }

    pub fn demofield(&self) -> Option<&str> {
        self.demofield.as_deref()
    }

    pub fn set_demofield(&mut self, demofield: Option<String>) {
        self.demofield = demofield;
    }
}

impl Entity for Demo {
    type Id = DemoId;

    fn id(&self) -> Option<DemoId> {
        self.id
    }
}

impl PartialEq for Demo {
    fn eq(&self, other: &Self) -> bool {
        if core::ptr::eq(self, other) {
            return true;
        }
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl core::fmt::Display for Demo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Demo{{id={id}")?,
            None => write!(f, "Demo{{id=null")?,
        }
        match &self.demofield {
            Some(v) => write!(f, ", demofield='{v}'}}"),
            None => write!(f, ", demofield='null'}}"),
        }
    }
}
