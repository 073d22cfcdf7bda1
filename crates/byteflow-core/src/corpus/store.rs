//! Corpus persistence.
//!
//! The corpus is loaded in full for every classification and mutated at most
//! once afterwards: either one appended line or one full rewrite. Single
//! writer, single process; no locking is attempted.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{parse_line, Record};
use crate::errors::CorpusError;

pub trait CorpusStore {
    /// Reads every record, in insertion order.
    fn load(&self) -> Result<Vec<Record>, CorpusError>;

    /// Adds one record at the end.
    fn append(&mut self, record: &Record) -> Result<(), CorpusError>;

    /// Replaces the whole corpus with `records`.
    fn rewrite(&mut self, records: &[Record]) -> Result<(), CorpusError>;
}

/// Newline-delimited JSON file, one record per line.
#[derive(Debug, Clone)]
pub struct JsonlCorpusStore {
    path: PathBuf,
    strict: bool,
}

struct Scan {
    /// Raw line text paired with its decoded record.
    entries: Vec<(String, Record)>,
    /// 1-based line number and parse failure.
    malformed: Vec<(usize, String)>,
}

impl JsonlCorpusStore {
    /// Lenient store: malformed lines are skipped with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            strict: false,
        }
    }

    /// When strict, the first malformed line fails the load instead.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> CorpusError {
        CorpusError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn scan(&self) -> Result<Scan, CorpusError> {
        let mut scan = Scan {
            entries: Vec::new(),
            malformed: Vec::new(),
        };
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(scan),
            Err(e) => return Err(self.io_err(e)),
        };

        for (idx, bytes) in BufReader::new(file).split(b'\n').enumerate() {
            let mut bytes = bytes.map_err(|e| self.io_err(e))?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => {
                    scan.malformed.push((idx + 1, e.to_string()));
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(&line) {
                Ok(record) => scan.entries.push((line, record)),
                Err(reason) => scan.malformed.push((idx + 1, reason)),
            }
        }
        Ok(scan)
    }

    /// The file a rewrite replaces: symlinks are resolved so the link survives.
    fn rewrite_target(&self) -> Result<PathBuf, CorpusError> {
        match std::fs::canonicalize(&self.path) {
            Ok(p) => Ok(p),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

impl CorpusStore for JsonlCorpusStore {
    fn load(&self) -> Result<Vec<Record>, CorpusError> {
        let scan = self.scan()?;
        if let Some((line, reason)) = scan.malformed.first() {
            if self.strict {
                return Err(CorpusError::Malformed {
                    path: self.path.clone(),
                    line: *line,
                    reason: reason.clone(),
                });
            }
        }
        for (line, reason) in &scan.malformed {
            tracing::warn!(
                path = %self.path.display(),
                line,
                "skipping malformed corpus line: {}",
                reason
            );
        }
        tracing::debug!(
            path = %self.path.display(),
            records = scan.entries.len(),
            "corpus loaded"
        );
        Ok(scan.entries.into_iter().map(|(_, r)| r).collect())
    }

    fn append(&mut self, record: &Record) -> Result<(), CorpusError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        if ends_mid_line(&mut file).map_err(|e| self.io_err(e))? {
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes()).map_err(|e| self.io_err(e))?;
        Ok(())
    }

    /// Lines whose record is unchanged are written back verbatim, so only
    /// modified records change on disk. Previously skipped malformed lines
    /// are dropped.
    fn rewrite(&mut self, records: &[Record]) -> Result<(), CorpusError> {
        let scan = self.scan()?;
        if !scan.malformed.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                dropped = scan.malformed.len(),
                "rewrite drops malformed corpus lines"
            );
        }

        let target = self.rewrite_target()?;
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_err(e))?;
        if let Ok(meta) = std::fs::metadata(&target) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| self.io_err(e))?;
        }
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            let mut existing = scan.entries.iter();
            for record in records {
                match existing.next() {
                    Some((raw, old)) if old == record => {
                        writeln!(out, "{raw}").map_err(|e| self.io_err(e))?;
                    }
                    _ => {
                        let line = serde_json::to_string(record)?;
                        writeln!(out, "{line}").map_err(|e| self.io_err(e))?;
                    }
                }
            }
            out.flush().map_err(|e| self.io_err(e))?;
        }
        tmp.persist(&target).map_err(|e| self.io_err(e.error))?;
        Ok(())
    }
}

/// True when a non-empty file does not end with a newline.
fn ends_mid_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// In-process store, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpusStore {
    records: Vec<Record>,
}

impl MemoryCorpusStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl CorpusStore for MemoryCorpusStore {
    fn load(&self) -> Result<Vec<Record>, CorpusError> {
        Ok(self.records.clone())
    }

    fn append(&mut self, record: &Record) -> Result<(), CorpusError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn rewrite(&mut self, records: &[Record]) -> Result<(), CorpusError> {
        self.records = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Fingerprint;

    fn record(label: &str, bits: &[u8]) -> Record {
        Record::new(label, Fingerprint::try_from(bits.to_vec()).unwrap()).unwrap()
    }

    #[test]
    fn missing_file_is_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlCorpusStore::open(dir.path().join("memory.jsonl"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlCorpusStore::open(dir.path().join("memory.jsonl"));
        store.append(&record("a", &[1, 0])).unwrap();
        store.append(&record("b", &[0, 1])).unwrap();

        let loaded = store.load().unwrap();
        let labels: Vec<_> = loaded.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["a", "b"]);

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn lenient_load_skips_bad_lines_strict_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        std::fs::write(
            &path,
            "{\"label\":\"a\",\"binary_flow\":[1]}\n\n{broken\n{\"label\":\"b\",\"binary_flow\":[0]}\n",
        )
        .unwrap();

        let lenient = JsonlCorpusStore::open(&path);
        assert_eq!(lenient.load().unwrap().len(), 2);

        let strict = JsonlCorpusStore::open(&path).strict(true);
        match strict.load() {
            Err(CorpusError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn rewrite_keeps_untouched_lines_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        // Non-compact separators, as written by other tools.
        let on_disk = "{\"label\": \"a\", \"binary_flow\": [1, 0]}\n\
                        {\"label\": \"b\", \"binary_flow\": [0, 1]}\n\
                        {\"label\": \"c\", \"binary_flow\": [1, 1], \"note\": \"kept\"}\n";
        std::fs::write(&path, on_disk).unwrap();

        let mut store = JsonlCorpusStore::open(&path);
        let mut records = store.load().unwrap();
        records[2].label = "z".into();
        store.rewrite(&records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        let before: Vec<_> = on_disk.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], before[0]);
        assert_eq!(lines[1], before[1]);
        assert_eq!(
            lines[2],
            r#"{"label":"z","binary_flow":[1,1],"note":"kept"}"#
        );
    }

    #[test]
    fn append_after_unterminated_last_line_starts_a_new_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        std::fs::write(&path, "{\"label\":\"a\",\"binary_flow\":[1,1]}").unwrap();

        let mut store = JsonlCorpusStore::open(&path);
        store.append(&record("b", &[1, 0])).unwrap();

        let labels: Vec<_> = store.load().unwrap().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, ["a", "b"]);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\"label\":\"a\",\"binary_flow\":[1,1]}\n{\"label\":\"b\",\"binary_flow\":[1,0]}\n"
        );
    }

    #[test]
    fn invalid_utf8_line_is_skipped_when_lenient() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        let mut bytes = b"{\"label\":\"a\",\"binary_flow\":[1]}\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe\n");
        bytes.extend_from_slice(b"{\"label\":\"b\",\"binary_flow\":[0]}\r\n");
        std::fs::write(&path, bytes).unwrap();

        let labels: Vec<_> = JsonlCorpusStore::open(&path)
            .load()
            .unwrap()
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, ["a", "b"]);

        match JsonlCorpusStore::open(&path).strict(true).load() {
            Err(CorpusError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_permissions_and_symlink() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        std::fs::write(&path, "{\"label\":\"a\",\"binary_flow\":[1]}\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        let link = dir.path().join("linked.jsonl");
        std::os::unix::fs::symlink(&path, &link).unwrap();

        let mut store = JsonlCorpusStore::open(&link);
        store.rewrite(&[record("z", &[1])]).unwrap();

        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(JsonlCorpusStore::open(&path).load().unwrap()[0].label, "z");
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryCorpusStore::default();
        store.append(&record("a", &[1])).unwrap();
        store.rewrite(&[record("b", &[0])]).unwrap();
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.load().unwrap()[0].label, "b");
    }
}
