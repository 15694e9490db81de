//! Element id generation, scoped to whoever owns the provider

use crate::element::ElementId;
use uuid::Uuid;

pub trait IdProvider {
    fn next_id(&mut self) -> ElementId;
}

/// Random v4 UUIDs; the default for editing sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdProvider for UuidIds {
    fn next_id(&mut self) -> ElementId {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-N` ids, counting from 1 per provider instance
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("element")
    }
}

impl IdProvider for SequentialIds {
    fn next_id(&mut self) -> ElementId {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
