//! The file templating engine: backup, substitute, restore.
//!
//! Every referenced file is first moved aside with a single atomic rename to
//! a hidden sibling (`.envsub~<name>` in the same directory), so a crash at
//! any point leaves exactly one recoverable copy. Only then is substituted
//! content written to the original path. Restoration renames each backup over
//! its original and runs exactly once per record, whether the run finishes
//! normally, fails, or is interrupted by SIGINT/SIGTERM.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, error, info};

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::interpolation::interpolate;

/// Prefix marking a hidden backup sibling.
pub const BACKUP_PREFIX: &str = ".envsub~";

/// One original-path to backup-path pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBackup {
    pub original: PathBuf,
    pub backup: PathBuf,
}

/// A file rewritten by the engine, with the content that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatedFile {
    pub path: PathBuf,
    pub content: String,
}

fn backup_path(original: &Path) -> Result<PathBuf> {
    let file_name = original
        .file_name()
        .ok_or_else(|| Error::Misc(format!("`{}` has no file name", original.display())))?;

    let mut hidden = OsString::from(BACKUP_PREFIX);
    hidden.push(file_name);
    Ok(original.with_file_name(hidden))
}

/// Shared registry of backup records.
///
/// Cloning shares the same underlying record list, so the signal handler
/// thread and the main thread observe one set of records. [`restore_all`]
/// drains the list under the lock, which is what makes restoration happen
/// exactly once per record no matter how many paths race to trigger it.
///
/// [`restore_all`]: BackupRegistry::restore_all
#[derive(Debug, Clone, Default)]
pub struct BackupRegistry {
    records: Arc<Mutex<Vec<FileBackup>>>,
}

impl BackupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FileBackup>> {
        // A poisoned lock only means another thread panicked mid-update;
        // restoration must still proceed with whatever records exist.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Moves `original` aside with one atomic rename and records the pairing.
    ///
    /// A path that is already backed up in this run is recorded again without
    /// a second rename: the second rename would clobber the backup with
    /// already-substituted content.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails; no record is added in that case.
    pub fn backup(&self, original: &Path) -> Result<()> {
        let backup = backup_path(original)?;

        let mut records = self.lock();
        let first_occurrence = !records.iter().any(|record| record.original == original);

        if first_occurrence {
            fs::rename(original, &backup).map_err(|e| {
                Error::io_error("backup", &original.display().to_string(), e)
            })?;
            debug!("Backed up `{}` to `{}`", original.display(), backup.display());
        }

        records.push(FileBackup {
            original: original.to_path_buf(),
            backup,
        });
        Ok(())
    }

    /// Snapshot of the current records, in backup order.
    pub fn records(&self) -> Vec<FileBackup> {
        self.lock().clone()
    }

    /// Restores every recorded backup to its original path.
    ///
    /// Drains the record list first, so a second call (from the drop guard
    /// after a normal restore, or from a late signal) finds nothing to do.
    /// Individual restore failures are logged and do not stop the remaining
    /// restores. Returns the number of files restored.
    pub fn restore_all(&self) -> usize {
        let records: Vec<FileBackup> = self.lock().drain(..).collect();
        let mut restored = 0;

        for record in records {
            // Duplicate occurrences share one backup; only the first record
            // still finds it on disk.
            if !record.backup.exists() {
                continue;
            }

            match fs::rename(&record.backup, &record.original) {
                Ok(()) => {
                    info!("Restored `{}`", record.original.display());
                    restored += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to restore `{}` from `{}`: {}",
                        record.original.display(),
                        record.backup.display(),
                        e
                    );
                }
            }
        }

        restored
    }
}

/// Guard that restores all recorded backups when dropped.
///
/// Covers early-return error paths; the normal path calls
/// [`BackupRegistry::restore_all`] itself and the drained registry makes the
/// drop a no-op.
pub struct RestoreGuard {
    registry: BackupRegistry,
}

impl RestoreGuard {
    pub fn new(registry: BackupRegistry) -> Self {
        Self { registry }
    }
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        self.registry.restore_all();
    }
}

/// Installs the SIGINT/SIGTERM handler that restores and exits.
///
/// Must be called before the first [`BackupRegistry::backup`]. Interruption
/// is a supported way to end a run, so the process exits with status 0 after
/// restoring.
///
/// # Errors
///
/// Returns an error if the handler cannot be installed.
pub fn install_restore_handler(registry: &BackupRegistry) -> Result<()> {
    let registry = registry.clone();
    ctrlc::set_handler(move || {
        let restored = registry.restore_all();
        eprintln!("\nAborted; restored {restored} templated file(s).");
        process::exit(0);
    })
    .map_err(|e| Error::Misc(format!("Could not install signal handler: {e}")))
}

/// Templates every referenced file, in order.
///
/// Phase one backs up all files before any content is touched; phase two
/// reads each backup, substitutes placeholders, and writes the result to the
/// original path. Returns the rewritten files with their new content so the
/// caller can print the audit sections.
///
/// # Errors
///
/// Returns an error if a backup rename or a read/write fails. Files already
/// backed up at that point remain recoverable through the registry.
pub fn template_files(
    registry: &BackupRegistry,
    references: &[PathBuf],
    environment: &Environment,
) -> Result<Vec<TemplatedFile>> {
    for original in references {
        registry.backup(original)?;
    }

    let mut templated = Vec::new();

    for record in registry.records() {
        let content = fs::read_to_string(&record.backup).map_err(|e| {
            Error::io_error("backup", &record.backup.display().to_string(), e)
        })?;

        let substituted = interpolate(&content, environment);

        fs::write(&record.original, &substituted).map_err(|e| {
            Error::io_error("templated", &record.original.display().to_string(), e)
        })?;

        templated.push(TemplatedFile {
            path: record.original.clone(),
            content: substituted,
        });
    }

    Ok(templated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> Environment {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_backup_path_hidden_sibling() {
        let path = backup_path(Path::new("/tmp/deploy/spec.yml")).unwrap();
        assert_eq!(path, Path::new("/tmp/deploy/.envsub~spec.yml"));
    }

    #[test]
    fn test_template_and_restore_round_trip() {
        let dir = tempdir().unwrap();
        let original = "Host: ${HOST}\nPath: $HOME\n";
        let path = write_file(dir.path(), "request.txt", original);

        let registry = BackupRegistry::new();
        let env = env_of(&[("HOST", "api.example.com")]);

        let templated = template_files(&registry, &[path.clone()], &env).unwrap();
        assert_eq!(templated.len(), 1);
        assert_eq!(templated[0].content, "Host: api.example.com\nPath: $HOME\n");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Host: api.example.com\nPath: $HOME\n"
        );

        assert_eq!(registry.restore_all(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(!dir.path().join(".envsub~request.txt").exists());
    }

    #[test]
    fn test_backup_exists_before_overwrite() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "file.txt", "original ${X}");

        let registry = BackupRegistry::new();
        registry.backup(&path).unwrap();

        let backup = dir.path().join(".envsub~file.txt");
        assert!(backup.is_file());
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original ${X}");
    }

    #[test]
    fn test_restore_all_is_exactly_once() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "file.txt", "content");

        let registry = BackupRegistry::new();
        registry.backup(&path).unwrap();

        assert_eq!(registry.restore_all(), 1);
        // Second call finds a drained registry.
        assert_eq!(registry.restore_all(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_duplicate_reference_single_backup() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "file.txt", "v=${V}");

        let registry = BackupRegistry::new();
        let env = env_of(&[("V", "1")]);

        let templated =
            template_files(&registry, &[path.clone(), path.clone()], &env).unwrap();
        // Both occurrences are processed, against the same backup content.
        assert_eq!(templated.len(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "v=1");

        registry.restore_all();
        assert_eq!(fs::read_to_string(&path).unwrap(), "v=${V}");
        assert!(!dir.path().join(".envsub~file.txt").exists());
    }

    #[test]
    fn test_interruption_mid_run_restores_everything() {
        let dir = tempdir().unwrap();
        let first = write_file(dir.path(), "a.txt", "a ${X}");
        let second = write_file(dir.path(), "b.txt", "b ${X}");

        let registry = BackupRegistry::new();
        registry.backup(&first).unwrap();
        registry.backup(&second).unwrap();

        // Simulate an interruption after backups but before substitution:
        // the signal handler calls restore_all on the shared registry.
        let handler_view = registry.clone();
        assert_eq!(handler_view.restore_all(), 2);

        assert_eq!(fs::read_to_string(&first).unwrap(), "a ${X}");
        assert_eq!(fs::read_to_string(&second).unwrap(), "b ${X}");
        assert!(!dir.path().join(".envsub~a.txt").exists());
        assert!(!dir.path().join(".envsub~b.txt").exists());
    }

    #[test]
    fn test_restore_guard_restores_on_drop() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "file.txt", "content");

        let registry = BackupRegistry::new();
        {
            let _guard = RestoreGuard::new(registry.clone());
            registry.backup(&path).unwrap();
            assert!(!path.exists());
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_backup_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let registry = BackupRegistry::new();
        let result = registry.backup(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(registry.records().is_empty());
    }
}
