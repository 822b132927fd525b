//! Persistence of trained models.
//!
//! A model artifact is laid out as
//!
//! ```text
//! "PSMD" | major u8 | minor u8 | payload length u64 LE | payload | crc32 u32 LE
//! ```
//!
//! where the payload is the bincode encoding of [`Model`] and the checksum
//! covers the payload only. Files are written to a temporary sibling and
//! renamed into place, so a crash never leaves a half-written model behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Result, SentimentError};
use crate::model::Model;

const MAGIC: &[u8; 4] = b"PSMD";
const VERSION_MAJOR: u8 = 1;
const VERSION_MINOR: u8 = 0;

/// Something that can save and restore a model.
pub trait ModelStore: Send + Sync {
    fn save(&self, model: &Model) -> Result<()>;

    fn load(&self) -> Result<Model>;

    /// Short human-readable location used in log lines.
    fn location(&self) -> String;
}

/// Stores one model in a file.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileModelStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ModelStore for FileModelStore {
    fn save(&self, model: &Model) -> Result<()> {
        let temp_path = self.temp_path();
        {
            let mut output = BufWriter::new(File::create(&temp_path)?);
            write_model(&mut output, model)?;
            output.flush()?;
            output.get_ref().sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        info!(
            "Saved {} model to {}",
            model.strategy(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Model> {
        let mut input = BufReader::new(File::open(&self.path)?);
        let model = read_model(&mut input)?;

        info!(
            "Loaded {} model from {}",
            model.strategy(),
            self.path.display()
        );
        Ok(model)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Encode `model` into an in-memory artifact.
pub fn encode_model(model: &Model) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_model(&mut bytes, model)?;
    Ok(bytes)
}

/// Decode an artifact produced by [`encode_model`].
pub fn decode_model(bytes: &[u8]) -> Result<Model> {
    let mut input = bytes;
    read_model(&mut input)
}

/// Write a complete artifact to `output`.
pub fn write_model<W: Write>(output: &mut W, model: &Model) -> Result<()> {
    let payload = bincode::serde::encode_to_vec(model, bincode::config::standard())
        .map_err(|e| SentimentError::serialization(format!("Failed to encode model: {e}")))?;

    output.write_all(MAGIC)?;
    output.write_all(&[VERSION_MAJOR, VERSION_MINOR])?;
    output.write_all(&(payload.len() as u64).to_le_bytes())?;
    output.write_all(&payload)?;
    output.write_all(&crc32fast::hash(&payload).to_le_bytes())?;

    debug!("Encoded model payload of {} bytes", payload.len());
    Ok(())
}

/// Read and verify a complete artifact from `input`.
pub fn read_model<R: Read>(input: &mut R) -> Result<Model> {
    let mut magic = [0u8; 4];
    input.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(SentimentError::corrupt("not a phrase-sentiment model file"));
    }

    let mut version = [0u8; 2];
    input.read_exact(&mut version)?;
    if version[0] != VERSION_MAJOR {
        return Err(SentimentError::unsupported(format!(
            "model format version {}.{}",
            version[0], version[1]
        )));
    }

    let mut length_bytes = [0u8; 8];
    input.read_exact(&mut length_bytes)?;
    let length = usize::try_from(u64::from_le_bytes(length_bytes))
        .map_err(|_| SentimentError::corrupt("payload length does not fit in memory"))?;

    let mut payload = Vec::new();
    input.by_ref().take(length as u64).read_to_end(&mut payload)?;
    if payload.len() != length {
        return Err(SentimentError::corrupt(format!(
            "payload truncated: expected {length} bytes, found {}",
            payload.len()
        )));
    }

    let mut checksum_bytes = [0u8; 4];
    input.read_exact(&mut checksum_bytes)?;
    let expected = u32::from_le_bytes(checksum_bytes);
    let actual = crc32fast::hash(&payload);
    if expected != actual {
        return Err(SentimentError::corrupt(format!(
            "checksum mismatch: stored {expected:08x}, computed {actual:08x}"
        )));
    }

    let (model, _): (Model, _) =
        bincode::serde::decode_from_slice(&payload, bincode::config::standard())
            .map_err(|e| SentimentError::serialization(format!("Failed to decode model: {e}")))?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::LabeledText;
    use crate::pipeline::{TrainingConfig, TrainingPipeline};

    fn model() -> Model {
        let corpus = vec![
            LabeledText::new("good movie", 4),
            LabeledText::new("bad film", 0),
        ];
        TrainingPipeline::new()
            .train(&corpus, &TrainingConfig::default())
            .unwrap()
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode_model(&model()).unwrap();

        assert_eq!(&bytes[..4], b"PSMD");
        assert_eq!(bytes[4], VERSION_MAJOR);
        let length = u64::from_le_bytes(bytes[6..14].try_into().unwrap()) as usize;
        assert_eq!(bytes.len(), 4 + 2 + 8 + length + 4);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode_model(&model()).unwrap();
        bytes[0] = b'X';

        assert!(matches!(
            decode_model(&bytes),
            Err(SentimentError::Corrupt(_))
        ));
    }

    #[test]
    fn test_flipped_payload_byte() {
        let mut bytes = encode_model(&model()).unwrap();
        bytes[20] ^= 0xff;

        assert!(matches!(
            decode_model(&bytes),
            Err(SentimentError::Corrupt(_))
        ));
    }

    #[test]
    fn test_truncated_file() {
        let bytes = encode_model(&model()).unwrap();

        assert!(decode_model(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_newer_major_version() {
        let mut bytes = encode_model(&model()).unwrap();
        bytes[4] = VERSION_MAJOR + 1;

        assert!(matches!(
            decode_model(&bytes),
            Err(SentimentError::Unsupported(_))
        ));
    }

    #[test]
    fn test_temp_path_is_a_sibling() {
        let store = FileModelStore::new("/models/naive-bayes.model");

        assert_eq!(
            store.temp_path(),
            PathBuf::from("/models/naive-bayes.model.tmp")
        );
    }
}
