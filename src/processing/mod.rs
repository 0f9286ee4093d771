/*! Shard housekeeping

Operations on already written shards, outside of the processing pipelines.
!*/
pub mod collect;

pub use collect::collect;
