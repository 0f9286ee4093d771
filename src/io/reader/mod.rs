/*! Shard reading utilities

A [ShardReader] lazily iterates over the documents of a gzip JSON lines shard.
!*/
mod shard;

pub use shard::ShardReader;
