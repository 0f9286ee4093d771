/*!
# IO utilities

Shard reading and writing, and the completion ledger.

Shards are gzip-compressed JSON lines files, one [crate::document::Document] per line.
!*/
pub mod ledger;
pub mod reader;
pub mod writer;

pub use ledger::{LedgerWriter, Outcome};
pub use reader::ShardReader;
pub use writer::RotatingWriter;
