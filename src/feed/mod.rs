//! Feed module - the paginated post listing

mod assembler;
mod controller;

pub use assembler::{normalize, FeedAssembler};
pub use controller::{FeedCommand, FeedController, FeedEvent};
