// * Snapshot persistence - the crawl result mapping is written to a flat
// * JSON file after every run, overwriting the previous contents.

use std::io;
use std::path::Path;
use tracing::info;

use crate::engine::results::ResultMap;

pub async fn write_snapshot(path: &Path, pages: &ResultMap) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(pages)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    tokio::fs::write(path, json).await?;
    info!(path = %path.display(), pages = pages.len(), "result snapshot written");
    Ok(())
}
