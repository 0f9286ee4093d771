/*! Collect complete raw shards

Writers rotate eagerly: the writer owning stripe `offset` opens shard `i + writers` as soon as shard `i` is full.
The existence of `i + writers` is then proof that `i` is closed, and that it can be moved
to another folder (an extract source, for example) while the download is still running.
!*/
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::Error;
use crate::io::writer::{shard_index, shard_name};

/// Move every complete `{prefix}_{i}.jsonl.gz` from `src` to `dst`.
///
/// `writers` is the number of writers of the run that produced the shards.
/// Shards that already exist in `dst` are left in place.
/// Returns the new paths of the moved shards.
pub fn collect(src: &Path, dst: &Path, prefix: &str, writers: usize) -> Result<Vec<PathBuf>, Error> {
    if writers == 0 {
        return Err(Error::Custom("writers has to be at least 1".to_string()));
    }
    std::fs::create_dir_all(dst)?;

    let mut indices = BTreeSet::new();
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if let Some(idx) = entry.file_name().to_str().and_then(|n| shard_index(prefix, n)) {
            indices.insert(idx);
        }
    }
    debug!("{} {} shards in {:?}", indices.len(), prefix, src);

    let mut moved = Vec::new();
    for idx in indices.iter().filter(|idx| indices.contains(&(**idx + writers))) {
        let name = shard_name(prefix, *idx);
        let to = dst.join(&name);
        if to.exists() {
            warn!("{:?} already exists, not moving {}", to, name);
            continue;
        }
        std::fs::rename(src.join(&name), &to)?;
        moved.push(to);
    }

    info!("moved {} shards from {:?} to {:?}", moved.len(), src, dst);
    Ok(moved)
}
