use std::io::{self, Write};

use crate::error::MaglevResult;
use crate::telemetry::{TelemetryRecord, TelemetrySink};

const HEADER: &str = "time,speed_kmh,gap_mm,status";

fn write_row<W: Write>(writer: &mut W, r: &TelemetryRecord) -> io::Result<()> {
    writeln!(writer, "{:.2},{:.4},{:.4},{}", r.time, r.speed_kmh, r.gap_mm, r.status)
}

/// Write telemetry rows to CSV format.
///
/// Columns: time, speed_kmh, gap_mm, status
pub fn write_telemetry<W: Write>(writer: &mut W, rows: &[TelemetryRecord]) -> io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for r in rows {
        write_row(writer, r)?;
    }
    Ok(())
}

/// Write telemetry to a CSV file at the given path.
pub fn write_telemetry_file(path: &str, rows: &[TelemetryRecord]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_telemetry(&mut file, rows)?;
    file.flush()
}

/// Streams rows to a writer as the mission runs. The header goes out with
/// the first row.
pub struct CsvSink<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, header_written: false }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TelemetrySink for CsvSink<W> {
    fn record(&mut self, record: &TelemetryRecord) -> MaglevResult<()> {
        if !self.header_written {
            writeln!(self.writer, "{HEADER}")?;
            self.header_written = true;
        }
        write_row(&mut self.writer, record)?;
        Ok(())
    }
}
