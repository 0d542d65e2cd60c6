// src/output/writer.rs

//! Output destinations and the two output formats.

use super::ScanResult;
use crate::config::OutputDestination;
use crate::errors::{io_error_with_path, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Creates the writer for an `OutputDestination`.
///
/// # Errors
/// Returns `Error::Io` if the output file cannot be created.
pub fn setup_output_writer(destination: &OutputDestination) -> Result<Box<dyn Write + Send>> {
    let writer: Box<dyn Write + Send> = match destination {
        OutputDestination::Stdout => Box::new(io::stdout()),
        OutputDestination::File(path) => {
            let file = File::create(path).map_err(|e| io_error_with_path(e, path))?;
            Box::new(BufWriter::new(file))
        }
    };
    Ok(writer)
}

/// Writes the autoload table as pretty-printed JSON followed by a newline.
///
/// # Errors
/// Returns `Error::Serialization` or `Error::Io` if writing fails.
pub fn write_json(result: &ScanResult, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &result.category_table())?;
    writeln!(writer).map_err(|e| io_error_with_path(e, "<output>"))?;
    Ok(())
}

/// Writes one `name<TAB>file` line per entry of the name-to-file map, sorted by name.
///
/// # Errors
/// Returns `Error::Io` if writing fails.
pub fn write_name_map(result: &ScanResult, writer: &mut dyn Write) -> Result<()> {
    for (name, file) in result.name_to_file() {
        writeln!(writer, "{}\t{}", name, file.display())
            .map_err(|e| io_error_with_path(e, "<output>"))?;
    }
    Ok(())
}
