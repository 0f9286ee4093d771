/*! Shard writing utilities

A [RotatingWriter] writes documents into gzip JSON lines shards, rotating after a fixed number of documents.
Several writers can share a destination: each one takes its own stripe of shard indices.
!*/
mod rotating;

pub use rotating::{next_index, shard_name, RotatingWriter};
pub(crate) use rotating::shard_index;
