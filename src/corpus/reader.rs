//! Tab-separated corpus reading.
//!
//! Training files carry at least a text column and an integer label column
//! (the Rotten Tomatoes layout is `PhraseId  SentenceId  Phrase  Sentiment`).
//! Columns are addressed by header name or by zero-based position. Records
//! that cannot be parsed are skipped and counted rather than failing the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};

use crate::corpus::{CorpusSource, Label, LabeledText, LoadedCorpus};
use crate::error::{Result, SentimentError};

/// How a column is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// Column with this header name.
    Name(String),
    /// Zero-based column position.
    Index(usize),
}

impl FromStr for ColumnRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(index) => ColumnRef::Index(index),
            Err(_) => ColumnRef::Name(s.to_string()),
        })
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "{name}"),
            ColumnRef::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// Layout of a tab-separated input file.
#[derive(Debug, Clone)]
pub struct TsvOptions {
    /// Whether the first row is a header (discarded as data).
    pub has_header: bool,
    /// Column holding the phrase text.
    pub text_column: ColumnRef,
    /// Column holding the sentiment label.
    pub label_column: ColumnRef,
}

impl Default for TsvOptions {
    fn default() -> Self {
        TsvOptions {
            has_header: true,
            text_column: ColumnRef::Name("Phrase".to_string()),
            label_column: ColumnRef::Name("Sentiment".to_string()),
        }
    }
}

/// Which part of a dataset a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSplit {
    /// Labeled training data.
    #[default]
    Train,
    /// Development data.
    Dev,
    /// Held-out test data.
    Test,
}

impl fmt::Display for DataSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSplit::Train => "train",
            DataSplit::Dev => "dev",
            DataSplit::Test => "test",
        };
        f.write_str(name)
    }
}

/// Corpus source backed by a tab-separated file.
#[derive(Debug, Clone)]
pub struct TsvCorpusReader {
    path: PathBuf,
    options: TsvOptions,
    split: DataSplit,
}

impl TsvCorpusReader {
    /// Create a reader for a training file.
    pub fn new<P: AsRef<Path>>(path: P, options: TsvOptions) -> Self {
        TsvCorpusReader {
            path: path.as_ref().to_path_buf(),
            options,
            split: DataSplit::Train,
        }
    }

    /// Select the dataset split this file holds.
    pub fn with_split(mut self, split: DataSplit) -> Self {
        self.split = split;
        self
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_train(&self) -> Result<LoadedCorpus> {
        let mut reader = open_tsv(&self.path, self.options.has_header)?;
        let headers = headers_of(&mut reader, self.options.has_header)?;
        let text_idx = resolve_column(&self.options.text_column, headers.as_ref())?;
        let label_idx = resolve_column(&self.options.label_column, headers.as_ref())?;

        let mut loaded = LoadedCorpus::default();
        for (row, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    debug!("Skipping malformed row {}: {e}", row + 1);
                    loaded.skipped += 1;
                    continue;
                }
            };

            match parse_labeled(&record, text_idx, label_idx) {
                Some(labeled) => loaded.records.push(labeled),
                None => {
                    debug!("Skipping row {}: missing text or non-integer label", row + 1);
                    loaded.skipped += 1;
                }
            }
        }

        if loaded.skipped > 0 {
            warn!(
                "Skipped {} malformed records in {}",
                loaded.skipped,
                self.path.display()
            );
        }
        info!(
            "Read {} labeled records from {}",
            loaded.records.len(),
            self.path.display()
        );

        Ok(loaded)
    }
}

impl CorpusSource for TsvCorpusReader {
    fn load(&self) -> Result<LoadedCorpus> {
        match self.split {
            DataSplit::Train => self.read_train(),
            split => Err(SentimentError::unsupported(format!(
                "reading the {split} split is not yet supported"
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.path.display(), self.split)
    }
}

/// Read the text column of an unlabeled file, in file order.
///
/// Unlike training input, a row without the text column is an error: every
/// input row must map to exactly one prediction.
pub fn read_unlabeled<P: AsRef<Path>>(path: P, options: &TsvOptions) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut reader = open_tsv(path, options.has_header)?;
    let headers = headers_of(&mut reader, options.has_header)?;
    let text_idx = resolve_column(&options.text_column, headers.as_ref())?;

    let mut texts = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let text = record.get(text_idx).ok_or_else(|| {
            SentimentError::invalid_corpus(format!(
                "row {} of {} has no column {}",
                row + 1,
                path.display(),
                options.text_column
            ))
        })?;
        texts.push(text.to_string());
    }

    info!("Read {} phrases from {}", texts.len(), path.display());
    Ok(texts)
}

fn open_tsv(path: &Path, has_header: bool) -> Result<csv::Reader<std::fs::File>> {
    // Phrases contain bare quotes, so quoting is disabled.
    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_header)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;
    Ok(reader)
}

fn headers_of(
    reader: &mut csv::Reader<std::fs::File>,
    has_header: bool,
) -> Result<Option<StringRecord>> {
    if has_header {
        Ok(Some(reader.headers()?.clone()))
    } else {
        Ok(None)
    }
}

fn resolve_column(column: &ColumnRef, headers: Option<&StringRecord>) -> Result<usize> {
    match (column, headers) {
        (ColumnRef::Index(index), _) => Ok(*index),
        (ColumnRef::Name(name), Some(headers)) => headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| {
                SentimentError::invalid_corpus(format!("no column named '{name}' in header"))
            }),
        (ColumnRef::Name(name), None) => Err(SentimentError::invalid_config(format!(
            "column '{name}' is addressed by name but the input has no header"
        ))),
    }
}

fn parse_labeled(record: &StringRecord, text_idx: usize, label_idx: usize) -> Option<LabeledText> {
    let text = record.get(text_idx)?;
    let label = record.get(label_idx)?.trim().parse::<Label>().ok()?;
    Some(LabeledText::new(text, label))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_tsv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_by_header_name() {
        let file = write_tsv(
            "PhraseId\tSentenceId\tPhrase\tSentiment\n\
             1\t1\tA series of escapades\t1\n\
             2\t1\tgood \"movie\"\t3\n",
        );

        let loaded = TsvCorpusReader::new(file.path(), TsvOptions::default())
            .load()
            .unwrap();

        assert_eq!(loaded.skipped, 0);
        assert_eq!(
            loaded.records,
            vec![
                LabeledText::new("A series of escapades", 1),
                LabeledText::new("good \"movie\"", 3),
            ]
        );
    }

    #[test]
    fn test_read_by_position_without_header() {
        let file = write_tsv("1\t1\tbad film\t0\n2\t1\tfine\t2\n");
        let options = TsvOptions {
            has_header: false,
            text_column: ColumnRef::Index(2),
            label_column: ColumnRef::Index(3),
        };

        let loaded = TsvCorpusReader::new(file.path(), options).load().unwrap();

        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0], LabeledText::new("bad film", 0));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let file = write_tsv(
            "PhraseId\tSentenceId\tPhrase\tSentiment\n\
             1\t1\tgood\t4\n\
             2\t1\tno label here\n\
             3\t1\tweird\tpositive\n\
             4\t1\tbad\t0\n",
        );

        let loaded = TsvCorpusReader::new(file.path(), TsvOptions::default())
            .load()
            .unwrap();

        assert_eq!(loaded.skipped, 2);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[1].label, 0);
    }

    #[test]
    fn test_unknown_column_name() {
        let file = write_tsv("Id\tText\n1\thello\n");

        let result = TsvCorpusReader::new(file.path(), TsvOptions::default()).load();

        assert!(matches!(result, Err(SentimentError::InvalidCorpus(_))));
    }

    #[test]
    fn test_dev_and_test_splits_are_unsupported() {
        let file = write_tsv("Phrase\tSentiment\nok\t2\n");

        for split in [DataSplit::Dev, DataSplit::Test] {
            let result = TsvCorpusReader::new(file.path(), TsvOptions::default())
                .with_split(split)
                .load();
            assert!(matches!(result, Err(SentimentError::Unsupported(_))));
        }
    }

    #[test]
    fn test_read_unlabeled() {
        let file = write_tsv(
            "PhraseId\tSentenceId\tPhrase\n\
             10\t2\tAn intermittently pleasing\n\
             11\t2\t\n\
             12\t2\tmostly routine effort\n",
        );

        let texts = read_unlabeled(file.path(), &TsvOptions::default()).unwrap();

        assert_eq!(
            texts,
            vec!["An intermittently pleasing", "", "mostly routine effort"]
        );
    }

    #[test]
    fn test_column_ref_parsing() {
        assert_eq!("2".parse::<ColumnRef>().unwrap(), ColumnRef::Index(2));
        assert_eq!(
            "Phrase".parse::<ColumnRef>().unwrap(),
            ColumnRef::Name("Phrase".to_string())
        );
    }
}
