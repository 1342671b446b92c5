use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::feed::record::{DetectionRecord, DetectionTable};
use crate::prelude::{FeedError, FeedResult, TableSource, COLUMNS};
use crate::telemetry::log::LogManager;

/// Reads the detection log from a fixed path on every call.
pub struct DetectionFeed {
    path: PathBuf,
    logger: LogManager,
}

impl DetectionFeed {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            logger: LogManager::new("feed"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the whole log. A missing file yields an empty table; any other
    /// failure, including malformed rows, is returned to the caller.
    pub fn load(&self) -> FeedResult<DetectionTable> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.logger
                    .note(&format!("{} not found, serving empty table", self.path.display()));
                return Ok(DetectionTable::empty());
            }
            Err(source) => {
                return Err(FeedError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let table = read_table(&self.path, file)?;
        self.logger.note(&format!(
            "loaded {} rows from {}",
            table.len(),
            self.path.display()
        ));
        Ok(table)
    }
}

impl TableSource for DetectionFeed {
    fn load(&self) -> FeedResult<DetectionTable> {
        DetectionFeed::load(self)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parses a headed CSV stream; `path` is only used for error reporting.
pub fn read_table<R: Read>(path: &Path, reader: R) -> FeedResult<DetectionTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|err| classify(path, err))?
        .clone();
    if let Some(column) = COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(FeedError::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<DetectionRecord>() {
        rows.push(record.map_err(|err| classify(path, err))?);
    }
    Ok(DetectionTable::from_rows(rows))
}

fn classify(path: &Path, err: csv::Error) -> FeedError {
    let line = err.position().map_or(0, |pos| pos.line());
    let reason = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => Some(err.to_string()),
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => Some(format!("expected {} fields, found {}", expected_len, len)),
        _ => None,
    };

    match reason {
        Some(reason) => FeedError::Malformed {
            path: path.to_path_buf(),
            line,
            reason,
        },
        None if err.is_io_error() => FeedError::Io {
            path: path.to_path_buf(),
            source: io::Error::from(err),
        },
        None => FeedError::Csv {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn feed_with(contents: &str) -> (NamedTempFile, DetectionFeed) {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        let feed = DetectionFeed::new(temp.path());
        (temp, feed)
    }

    #[test]
    fn missing_file_yields_empty_table() {
        let dir = tempdir().unwrap();
        let feed = DetectionFeed::new(dir.path().join("detection_data.csv"));
        let table = feed.load().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), COLUMNS);
    }

    #[test]
    fn feed_describes_its_path() {
        let feed = DetectionFeed::new("logs/detection_data.csv");
        assert_eq!(feed.path(), Path::new("logs/detection_data.csv"));
        assert_eq!(TableSource::describe(&feed), "logs/detection_data.csv");
    }

    #[test]
    fn load_preserves_file_order() {
        let (_temp, feed) = feed_with("Timestamp,Object,Count\nt1,cat,3\nt2,dog,5\nt1,cat,2\n");
        let table = feed.load().unwrap();
        assert_eq!(
            table.rows(),
            &[
                DetectionRecord::new("t1", "cat", 3),
                DetectionRecord::new("t2", "dog", 5),
                DetectionRecord::new("t1", "cat", 2),
            ]
        );
    }

    #[test]
    fn repeated_loads_are_equal() {
        let (_temp, feed) = feed_with("Timestamp,Object,Count\nt1,person,4\n");
        assert_eq!(feed.load().unwrap(), feed.load().unwrap());
    }

    #[test]
    fn header_only_file_is_empty() {
        let (_temp, feed) = feed_with("Timestamp,Object,Count\n");
        assert!(feed.load().unwrap().is_empty());
    }

    #[test]
    fn columns_may_be_reordered_or_extended() {
        let (_temp, feed) = feed_with("Count,Confidence,Object,Timestamp\n7,0.9,car,10:00:01\n");
        let table = feed.load().unwrap();
        assert_eq!(table.rows(), &[DetectionRecord::new("10:00:01", "car", 7)]);
    }

    #[test]
    fn missing_column_fails_fast() {
        let (_temp, feed) = feed_with("Timestamp,Label,Count\nt1,cat,3\n");
        match feed.load() {
            Err(FeedError::MissingColumn { column, .. }) => assert_eq!(column, "Object"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn zero_byte_file_reports_missing_header() {
        let (_temp, feed) = feed_with("");
        assert!(matches!(
            feed.load(),
            Err(FeedError::MissingColumn {
                column: "Timestamp",
                ..
            })
        ));
    }

    #[test]
    fn non_numeric_count_reports_line() {
        let (_temp, feed) = feed_with("Timestamp,Object,Count\nt1,cat,3\nt2,dog,many\n");
        match feed.load() {
            Err(FeedError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed row, got {:?}", other),
        }
    }

    #[test]
    fn negative_count_is_malformed() {
        let (_temp, feed) = feed_with("Timestamp,Object,Count\nt1,cat,-1\n");
        assert!(matches!(feed.load(), Err(FeedError::Malformed { .. })));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let (_temp, feed) = feed_with("Timestamp,Object,Count\nt1,cat\n");
        assert!(matches!(feed.load(), Err(FeedError::Malformed { line: 2, .. })));
    }

    #[test]
    fn invalid_utf8_header_keeps_csv_error_chain() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"Timestamp,Obj\xffct,Count\nt1,cat,3\n").unwrap();
        let feed = DetectionFeed::new(temp.path());
        match feed.load() {
            Err(err @ FeedError::Csv { .. }) => {
                assert!(std::error::Error::source(&err).is_some());
                assert!(err.to_string().contains("csv failure"));
            }
            other => panic!("expected csv failure, got {:?}", other),
        }
    }

    #[test]
    fn directory_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        let feed = DetectionFeed::new(dir.path());
        assert!(matches!(feed.load(), Err(FeedError::Io { .. })));
    }
}
