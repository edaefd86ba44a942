//! Migration discovery
//!
//! A migrations base directory has up to three subdirectories:
//!
//! ```text
//! <base>/
//!   repeatable_before/   *.sql  always run, first
//!   sequential/          *.sql  run once, yyyyMMddHHmmss_description.sql
//!   repeatable_after/    *.sql  always run, last
//! ```
//!
//! A missing subdirectory counts as empty. Repeatable files may carry a
//! `<digits>_` prefix to order them; files without one get version `-1` and
//! sort ahead of the numbered ones.

use crate::errors::{MigrationError, Result};
use crate::model::Migration;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPEATABLE_BEFORE_DIR: &str = "repeatable_before";
pub const SEQUENTIAL_DIR: &str = "sequential";
pub const REPEATABLE_AFTER_DIR: &str = "repeatable_after";

/// Smallest valid sequential version (year 2000, as yyyyMMddHHmmss)
pub const MIN_SEQUENTIAL_VERSION: i64 = 20_000_000_000_000;
/// Largest value a 14-digit version can take
pub const MAX_SEQUENTIAL_VERSION: i64 = 99_999_999_999_999;
/// Version given to repeatable files without a numeric prefix
pub const UNVERSIONED: i64 = -1;

static VERSION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)_").expect("version prefix pattern is valid"));

/// Build the ordered list of migrations to run against a database whose
/// watermark is `current_version`
///
/// Order: every repeatable_before file, then sequential files newer than the
/// watermark, then every repeatable_after file. Each group is sorted by
/// version, ties broken by file name.
///
/// # Errors
///
/// - `MigrationFormat` if any sequential file has no `<digits>_` prefix, or
///   if any eligible sequential version falls outside
///   `[MIN_SEQUENTIAL_VERSION, MAX_SEQUENTIAL_VERSION]`. Every offending file
///   is reported together, by name.
/// - `Io` if an existing subdirectory cannot be listed
pub fn discover(base_path: &Path, current_version: i64) -> Result<Vec<Migration>> {
    let mut migrations = scan_repeatable(&base_path.join(REPEATABLE_BEFORE_DIR))?;

    let mut sequential = scan_sequential(&base_path.join(SEQUENTIAL_DIR))?;
    sequential.retain(|m| m.version() > current_version);
    migrations.extend(sequential);

    migrations.extend(scan_repeatable(&base_path.join(REPEATABLE_AFTER_DIR))?);

    validate_sequential_range(&migrations)?;

    Ok(migrations)
}

/// File names of every repeatable migration under `base_path`
///
/// Their bookkeeping rows are not part of the sequential history, so the
/// watermark read skips them.
///
/// # Errors
///
/// `Io` if an existing repeatable subdirectory cannot be listed.
pub fn repeatable_names(base_path: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for dir in [REPEATABLE_BEFORE_DIR, REPEATABLE_AFTER_DIR] {
        names.extend(sql_files(&base_path.join(dir))?.into_iter().map(|(name, _)| name));
    }
    Ok(names)
}

/// Parse the leading `<digits>_` of a file name
///
/// `Ok(None)` when there is no such prefix.
///
/// # Errors
///
/// `MigrationFormat` if the digits do not fit in an `i64`.
pub fn parse_version_prefix(file_name: &str) -> Result<Option<i64>> {
    let Some(caps) = VERSION_PREFIX.captures(file_name) else {
        return Ok(None);
    };
    caps[1]
        .parse::<i64>()
        .map(Some)
        .map_err(|_| {
            MigrationError::UnparsableVersion {
                file: file_name.to_string(),
            }
            .into()
        })
}

/// Whether a version is a valid 14-digit sequential timestamp
pub fn is_valid_sequential_version(version: i64) -> bool {
    (MIN_SEQUENTIAL_VERSION..=MAX_SEQUENTIAL_VERSION).contains(&version)
}

fn scan_repeatable(dir: &Path) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();
    for (name, path) in sql_files(dir)? {
        let version = parse_version_prefix(&name)?.unwrap_or(UNVERSIONED);
        migrations.push(Migration::new(version, name, path, true));
    }
    sort_by_version(&mut migrations);
    Ok(migrations)
}

fn scan_sequential(dir: &Path) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();
    let mut unprefixed = Vec::new();
    for (name, path) in sql_files(dir)? {
        match parse_version_prefix(&name)? {
            Some(version) => migrations.push(Migration::new(version, name, path, false)),
            None => unprefixed.push(name),
        }
    }
    if !unprefixed.is_empty() {
        return Err(MigrationError::MissingVersionPrefix { files: unprefixed }.into());
    }
    sort_by_version(&mut migrations);
    Ok(migrations)
}

fn validate_sequential_range(migrations: &[Migration]) -> Result<()> {
    let offenders: Vec<String> = migrations
        .iter()
        .filter(|m| !m.is_repeatable() && !is_valid_sequential_version(m.version()))
        .map(|m| m.name().to_string())
        .collect();

    if offenders.is_empty() {
        Ok(())
    } else {
        Err(MigrationError::VersionOutOfRange { files: offenders }.into())
    }
}

fn sort_by_version(migrations: &mut [Migration]) {
    migrations.sort_by(|a, b| {
        a.version()
            .cmp(&b.version())
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Regular files in `dir` whose name ends in `.sql` (any case), sorted by name
fn sql_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let unreadable = |source| MigrationError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if name.to_ascii_lowercase().ends_with(".sql") {
            files.push((name, path));
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MigErrorKind;
    use tempfile::TempDir;

    fn touch(base: &Path, dir: &str, name: &str) {
        let dir = base.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), "SELECT 1;").unwrap();
    }

    fn names(migrations: &[Migration]) -> Vec<&str> {
        migrations.iter().map(Migration::name).collect()
    }

    #[test]
    fn test_parse_version_prefix() {
        assert_eq!(
            parse_version_prefix("20221029000000_init.sql").unwrap(),
            Some(20221029000000)
        );
        assert_eq!(parse_version_prefix("001_views.sql").unwrap(), Some(1));
        assert_eq!(parse_version_prefix("views.sql").unwrap(), None);
        assert_eq!(parse_version_prefix("20221029000000.sql").unwrap(), None);
        assert_eq!(parse_version_prefix("_20221029000000.sql").unwrap(), None);
    }

    #[test]
    fn test_parse_version_prefix_overflow() {
        let err = parse_version_prefix("99999999999999999999_huge.sql").unwrap_err();
        assert_eq!(err.kind(), MigErrorKind::MigrationFormat);
    }

    #[test]
    fn test_missing_base_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let migrations = discover(&dir.path().join("nope"), -1).unwrap();
        assert!(migrations.is_empty());
    }

    #[test]
    fn test_group_order_is_before_sequential_after() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), REPEATABLE_AFTER_DIR, "create_views.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_init.sql");
        touch(dir.path(), REPEATABLE_BEFORE_DIR, "drop_views.sql");

        let migrations = discover(dir.path(), -1).unwrap();
        assert_eq!(
            names(&migrations),
            ["drop_views.sql", "20221029000000_init.sql", "create_views.sql"]
        );
        assert!(migrations[0].is_repeatable());
        assert!(!migrations[1].is_repeatable());
        assert!(migrations[2].is_repeatable());
    }

    #[test]
    fn test_sequential_sorted_by_version_and_filtered_by_watermark() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_init.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "20221028000000_older.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "20221030000000_newer.sql");

        let all = discover(dir.path(), -1).unwrap();
        assert_eq!(
            names(&all),
            [
                "20221028000000_older.sql",
                "20221029000000_init.sql",
                "20221030000000_newer.sql"
            ]
        );

        let pending = discover(dir.path(), 20221029000000).unwrap();
        assert_eq!(names(&pending), ["20221030000000_newer.sql"]);
    }

    #[test]
    fn test_unversioned_repeatables_sort_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), REPEATABLE_BEFORE_DIR, "002_second.sql");
        touch(dir.path(), REPEATABLE_BEFORE_DIR, "zz_unnumbered.sql");
        touch(dir.path(), REPEATABLE_BEFORE_DIR, "001_first.sql");
        touch(dir.path(), REPEATABLE_BEFORE_DIR, "aa_unnumbered.sql");

        let migrations = discover(dir.path(), -1).unwrap();
        assert_eq!(
            names(&migrations),
            [
                "aa_unnumbered.sql",
                "zz_unnumbered.sql",
                "001_first.sql",
                "002_second.sql"
            ]
        );
        assert_eq!(migrations[0].version(), UNVERSIONED);
        assert_eq!(migrations[2].version(), 1);
    }

    #[test]
    fn test_extension_match_is_case_insensitive_and_filters_others() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_init.SQL");
        touch(dir.path(), SEQUENTIAL_DIR, "README.md");
        touch(dir.path(), SEQUENTIAL_DIR, "notes.sql.bak");
        fs::create_dir_all(dir.path().join(SEQUENTIAL_DIR).join("nested.sql")).unwrap();

        let migrations = discover(dir.path(), -1).unwrap();
        assert_eq!(names(&migrations), ["20221029000000_init.SQL"]);
    }

    #[test]
    fn test_sequential_without_prefix_fails() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_init.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "add_column.sql");

        let err = discover(dir.path(), -1).unwrap_err();
        assert_eq!(err.kind(), MigErrorKind::MigrationFormat);
        assert_eq!(err.offenders().unwrap(), ["add_column.sql"]);
    }

    #[test]
    fn test_every_unprefixed_sequential_file_is_reported() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), SEQUENTIAL_DIR, "drop_column.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_init.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "add_column.sql");

        let err = discover(dir.path(), 20221029000000).unwrap_err();
        assert_eq!(err.kind(), MigErrorKind::MigrationFormat);
        assert_eq!(
            err.offenders().unwrap(),
            ["add_column.sql", "drop_column.sql"]
        );
        assert!(err.message().contains("add_column.sql\ndrop_column.sql"));
    }

    #[test]
    fn test_repeatable_names_cover_both_repeatable_dirs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), REPEATABLE_BEFORE_DIR, "drop_views.sql");
        touch(dir.path(), REPEATABLE_AFTER_DIR, "20300101000000_views.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_init.sql");

        let names = repeatable_names(dir.path()).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("drop_views.sql"));
        assert!(names.contains("20300101000000_views.sql"));

        assert!(repeatable_names(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_versions_are_aggregated() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), SEQUENTIAL_DIR, "1_tiny.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "2022102900000_thirteen_digits.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_ok.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "100000000000000_fifteen_digits.sql");

        let err = discover(dir.path(), -1).unwrap_err();
        assert_eq!(err.kind(), MigErrorKind::MigrationFormat);
        assert_eq!(
            err.offenders().unwrap(),
            [
                "1_tiny.sql",
                "2022102900000_thirteen_digits.sql",
                "100000000000000_fifteen_digits.sql"
            ]
        );
        assert!(err
            .message()
            .starts_with("Incorrectly named migrations found:\n"));
    }

    #[test]
    fn test_out_of_range_below_watermark_is_not_reported() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), SEQUENTIAL_DIR, "1_legacy.sql");
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_ok.sql");

        let migrations = discover(dir.path(), 20221028000000).unwrap();
        assert_eq!(names(&migrations), ["20221029000000_ok.sql"]);
    }

    #[test]
    fn test_repeatables_are_exempt_from_range_check() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), REPEATABLE_AFTER_DIR, "1_small.sql");
        touch(dir.path(), REPEATABLE_AFTER_DIR, "views.sql");

        let migrations = discover(dir.path(), -1).unwrap();
        assert_eq!(migrations.len(), 2);
    }

    #[test]
    fn test_sql_is_not_read_during_discovery() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), SEQUENTIAL_DIR, "20221029000000_init.sql");

        let migrations = discover(dir.path(), -1).unwrap();
        assert!(!migrations[0].is_loaded());
    }
}
