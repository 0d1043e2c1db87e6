use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::types::stop_list::StopList;

/// One term per line, newline-terminated.
pub fn write_stop_list(path: &Path, stop_list: &StopList) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let f = fs::File::create(path)?;
    let mut out = BufWriter::new(f);
    for term in &stop_list.terms {
        writeln!(out, "{term}")?;
    }
    out.flush()?;

    info!(path = %path.display(), terms = stop_list.len(), "wrote stop list");
    Ok(())
}
