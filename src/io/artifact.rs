use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Write a value as gzip-compressed JSON.
///
/// Used for the intermediate pipeline artifacts (events, corpus, topic
/// results) so a later command can pick up where an earlier one stopped.
pub fn write_artifact<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, value)
        .with_context(|| format!("Failed to write artifact: {:?}", path))?;
    let mut inner = encoder
        .finish()
        .with_context(|| format!("Failed to finish artifact: {:?}", path))?;
    inner
        .flush()
        .with_context(|| format!("Failed to flush artifact: {:?}", path))?;
    Ok(())
}

/// Read a value written by [`write_artifact`]
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    serde_json::from_reader(decoder)
        .with_context(|| format!("Failed to parse artifact: {:?}", path))
}
