//! Flat CSV export of a session log.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::session::recorder::RepetitionRecord;
use crate::session::SessionId;

pub const CSV_HEADER: &str = "session_id,timestamp,repetition_number,interval,cumulative_time,rpm";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn export_file_name(session_id: &SessionId) -> String {
    format!("jumps_{}.csv", session_id)
}

/// Write the header and one row per record
pub fn write_csv<W: Write>(
    writer: &mut W,
    session_id: &SessionId,
    records: &[RepetitionRecord],
) -> io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    let id = escape_field(session_id.as_str());
    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            id,
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.repetition_number,
            record.interval,
            record.cumulative_time,
            record.rpm
        )?;
    }
    Ok(())
}

/// Write `<dir>/jumps_<session_id>.csv`, creating `dir` if needed
pub fn export_csv(
    dir: &Path,
    session_id: &SessionId,
    records: &[RepetitionRecord],
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(session_id));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_csv(&mut writer, session_id, records)?;
    writer.flush()?;
    Ok(path)
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
