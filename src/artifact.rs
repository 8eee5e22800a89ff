//! Gzip-compressed MessagePack files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use rmp_serde::{decode::from_read, encode::write_named};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;

const COMPRESSION_LEVEL: u32 = 3;

/// Serializes `value` with named fields and gzips it into `path`.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::new(COMPRESSION_LEVEL));
    write_named(&mut encoder, value)?;
    encoder.finish()?.flush()?;
    Ok(())
}

/// Reads a file written by [`save`].
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let reader = GzDecoder::new(BufReader::new(file));
    Ok(from_read(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        weights: Vec<f64>,
    }

    #[test]
    fn file_is_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.msgpack.gz");
        let sample = Sample {
            name: "x".into(),
            weights: vec![0.5, -1.25],
        };
        save(&path, &sample).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        assert_eq!(load::<Sample>(&path).unwrap(), sample);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.msgpack.gz");
        save(&path, &"not a sample").unwrap();
        assert!(matches!(
            load::<Sample>(&path),
            Err(crate::Error::Decode(_))
        ));
    }
}
