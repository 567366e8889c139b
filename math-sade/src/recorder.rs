//! CSV export of the per-generation log.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::sade::LogLine;

/// Column header written by [`write_log_csv`].
pub const CSV_HEADER: &str = "gen,fevals,best,f,cr,dx,df";

/// Get the records directory using the directories crate
pub fn records_dir() -> Result<PathBuf, String> {
    let proj_dirs = ProjectDirs::from("org", "spinorama", "math-audio")
        .ok_or("Failed to determine project directories")?;

    Ok(proj_dirs.cache_dir().join("records"))
}

/// Writes `log` to `path` as CSV, one row per log line.
///
/// Parent directories are created when missing.
pub fn write_log_csv(log: &[LogLine], path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent)?,
        _ => {}
    }
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{}", CSV_HEADER)?;
    for line in log {
        writeln!(
            file,
            "{},{},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e}",
            line.generation, line.fevals, line.best, line.f, line.cr, line.dx, line.df
        )?;
    }
    file.flush()
}

/// Saves `log` as `<records_dir>/<function_name>_sade.csv` and returns the path.
pub fn save_log(function_name: &str, log: &[LogLine]) -> Result<PathBuf, String> {
    let path = records_dir()?.join(format!("{}_sade.csv", function_name));
    write_log_csv(log, &path).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(path)
}
