//! Client-side view of the resource board.
//!
//! The feed receives rows from two paths: the initial listing and realtime
//! pushes (including the echo of the viewer's own submissions). Both go through
//! [`ResourceFeed::merge`], which upserts by id.

use bistro_core::{Entity, RecordId};

use crate::resource::InterviewResource;
use crate::stream::{Stream, UnknownStream};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StreamFilter {
    All,
    Only(Stream),
}

impl StreamFilter {
    /// `"All"` and blank input mean no filter.
    pub fn parse(raw: Option<&str>) -> Result<Self, UnknownStream> {
        match raw.map(str::trim) {
            None | Some("") | Some("All") => Ok(StreamFilter::All),
            Some(name) => name.parse().map(StreamFilter::Only),
        }
    }

    pub fn matches(&self, resource: &InterviewResource) -> bool {
        match self {
            StreamFilter::All => true,
            StreamFilter::Only(stream) => resource.stream() == *stream,
        }
    }
}

/// Resources ordered newest first, unique by id.
#[derive(Debug, Clone, Default)]
pub struct ResourceFeed {
    entries: Vec<InterviewResource>,
}

impl ResourceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = InterviewResource>) -> Self {
        let mut feed = Self::new();
        for row in rows {
            feed.merge(row);
        }
        feed
    }

    /// Insert or replace by id, keeping newest-first order.
    ///
    /// Returns `true` when the id was not already present.
    pub fn merge(&mut self, resource: InterviewResource) -> bool {
        let fresh = self.remove(resource.id()).is_none();
        let at = self
            .entries
            .iter()
            .position(|e| sorts_before(&resource, e))
            .unwrap_or(self.entries.len());
        self.entries.insert(at, resource);
        fresh
    }

    fn remove(&mut self, id: &RecordId) -> Option<InterviewResource> {
        let idx = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[InterviewResource] {
        &self.entries
    }

    pub fn filtered(&self, filter: StreamFilter) -> Vec<&InterviewResource> {
        self.entries.iter().filter(|r| filter.matches(r)).collect()
    }

    pub fn into_filtered(self, filter: StreamFilter) -> Vec<InterviewResource> {
        self.entries.into_iter().filter(|r| filter.matches(r)).collect()
    }
}

// Newest first; ids (v7, time-ordered) break timestamp ties.
fn sorts_before(a: &InterviewResource, b: &InterviewResource) -> bool {
    (a.created_at(), a.id()) > (b.created_at(), b.id())
}
