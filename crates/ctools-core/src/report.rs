// ── Status report writer ──
//
// CSV output for the status task. The file starts with a UTF-8 byte order
// mark and the fixed status header; every row is flushed to storage before
// `append_row` returns, so an interrupted scan leaves a readable prefix.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{STATUS_HEADER, StatusRow};

/// UTF-8 byte order mark written ahead of the header.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// What to do with a report file that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputMode {
    /// Delete the existing file and start a fresh report.
    #[default]
    Replace,
    /// Keep existing rows and add new ones after them.
    Append,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Cannot write report {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Existing report {} has a different header: {found}", path.display())]
    HeaderMismatch { path: PathBuf, found: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Row-at-a-time writer for the status report.
pub struct ReportWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
    header_written: bool,
}

impl ReportWriter {
    /// Open `path` for writing according to `mode`.
    ///
    /// In append mode an existing header must match the status header
    /// exactly; an empty or missing file is treated as new.
    pub fn prepare_output(path: impl AsRef<Path>, mode: OutputMode) -> Result<Self, ReportError> {
        let path = path.as_ref().to_path_buf();

        let header_written = match mode {
            OutputMode::Replace => {
                match fs::remove_file(&path) {
                    Ok(()) => info!(path = %path.display(), "removed existing report"),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(io_error(&path, e)),
                }
                false
            }
            OutputMode::Append => match read_header(&path)? {
                None => false,
                Some(found) if found.iter().map(String::as_str).eq(STATUS_HEADER) => true,
                Some(found) => {
                    return Err(ReportError::HeaderMismatch {
                        path,
                        found: found.join(","),
                    });
                }
            },
        };

        if header_written {
            drop_partial_row(&path)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error(&path, e))?;
        if !header_written {
            let len = file.metadata().map_err(|e| io_error(&path, e))?.len();
            if len == 0 {
                file.write_all(BOM).map_err(|e| io_error(&path, e))?;
            }
        }
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(file);

        debug!(path = %path.display(), %mode, header_written, "report output ready");
        Ok(Self {
            path,
            writer,
            rows: 0,
            header_written,
        })
    }

    /// Write the header unless the file already has it.
    pub fn write_header(&mut self) -> Result<(), ReportError> {
        if self.header_written {
            return Ok(());
        }

        self.writer.write_record(STATUS_HEADER)?;
        self.sync()?;
        self.header_written = true;
        Ok(())
    }

    /// Write one row and make it durable before returning.
    pub fn append_row(&mut self, row: StatusRow) -> Result<(), ReportError> {
        self.write_header()?;
        self.writer.write_record(row.into_record())?;
        self.sync()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written by this writer (not counting rows that were already there).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sync(&mut self) -> Result<(), ReportError> {
        self.writer.flush().map_err(|e| io_error(&self.path, e))?;
        self.writer
            .get_ref()
            .sync_data()
            .map_err(|e| io_error(&self.path, e))
    }
}

/// First record of an existing report, with any byte order mark removed.
fn read_header(path: &Path) -> Result<Option<Vec<String>>, ReportError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(None);
    }

    let fields = record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            if i == 0 {
                field.trim_start_matches('\u{feff}').to_owned()
            } else {
                field.to_owned()
            }
        })
        .collect();
    Ok(Some(fields))
}

/// Cut an unterminated last row left behind by an interrupted run, so new
/// rows start on a line of their own.
fn drop_partial_row(path: &Path) -> Result<(), ReportError> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    if bytes.last().is_none_or(|&b| b == b'\n') {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| io_error(path, e))?;
    match bytes.iter().rposition(|&b| b == b'\n') {
        Some(end) => {
            let kept = u64::try_from(end + 1).map_err(|e| io_error(path, io::Error::other(e)))?;
            warn!(
                path = %path.display(),
                dropped_bytes = bytes.len() - (end + 1),
                "discarding incomplete last row of existing report"
            );
            file.set_len(kept).map_err(|e| io_error(path, e))?;
        }
        // Header without its terminator.
        None => {
            file.seek(SeekFrom::End(0)).map_err(|e| io_error(path, e))?;
            file.write_all(b"\r\n").map_err(|e| io_error(path, e))?;
        }
    }
    file.sync_data().map_err(|e| io_error(path, e))
}

impl std::fmt::Debug for ReportWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportWriter")
            .field("path", &self.path)
            .field("rows", &self.rows)
            .field("header_written", &self.header_written)
            .finish_non_exhaustive()
    }
}

fn io_error(path: &Path, source: io::Error) -> ReportError {
    ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}
