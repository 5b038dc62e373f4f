//! Shared interview-prep link board.

pub mod feed;
pub mod resource;
pub mod stream;

pub use feed::{ResourceFeed, StreamFilter};
pub use resource::{InterviewResource, NewResource};
pub use stream::{Stream, UnknownStream};
