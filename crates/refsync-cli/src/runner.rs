//! Bounded-parallel per-file processing.
//!
//! Every file is scanned and rewritten independently; a failure in one file
//! never aborts the others. New content is assembled fully in memory and
//! written in a single atomic replace, so cancellation can never leave a
//! file with mixed content.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use refsync_engine::{EndOfLine, Rewrite, matcher_for_path, rewrite};
use refsync_fetch::{Fetcher, apply_manifest, is_manifest};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Per-run counters reported at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
}

#[derive(Debug)]
enum FileOutcome {
    Updated,
    UpToDate,
    /// No start marker matched; nothing to do.
    NoReferences,
    ManifestApplied(usize),
    Cancelled,
}

/// Processes every file under `paths` concurrently, bounded by the number
/// of available processing units.
pub async fn run(
    paths: &[PathBuf],
    recurse: bool,
    default_eol: EndOfLine,
    cancel: CancellationToken,
) -> Result<RunSummary> {
    let files = refsync_fs::collect_files(paths, recurse);
    let fetcher = Arc::new(Fetcher::new()?);
    let limit = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let semaphore = Arc::new(Semaphore::new(limit));

    let mut tasks = JoinSet::new();
    for file in files {
        if cancel.is_cancelled() {
            break;
        }
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");
        let fetcher = fetcher.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let outcome = tokio::select! {
                _ = cancel.cancelled() => Ok(FileOutcome::Cancelled),
                result = process_file(&file, &fetcher, default_eol) => result,
            };
            (file, outcome)
        });
    }

    let mut summary = RunSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((file, Ok(outcome))) => report(&mut summary, &file, outcome),
            Ok((file, Err(error))) => {
                summary.failed += 1;
                eprintln!(
                    "{}: {}: {}",
                    "error".red().bold(),
                    file.display(),
                    error
                );
            }
            Err(join_error) => {
                summary.failed += 1;
                eprintln!("{}: worker task failed: {}", "error".red().bold(), join_error);
            }
        }
    }

    summary.cancelled = cancel.is_cancelled();
    Ok(summary)
}

fn report(summary: &mut RunSummary, file: &Path, outcome: FileOutcome) {
    match outcome {
        FileOutcome::Updated => {
            summary.updated += 1;
            println!("{} {}", "updated".green().bold(), file.display());
        }
        FileOutcome::UpToDate => {
            summary.up_to_date += 1;
            println!("{} {}", "up to date".cyan(), file.display());
        }
        FileOutcome::NoReferences => {
            summary.skipped += 1;
            tracing::debug!(file = %file.display(), "no reference blocks");
        }
        FileOutcome::ManifestApplied(count) => {
            summary.updated += count;
            println!(
                "{} {} ({} files)",
                "manifest applied".green().bold(),
                file.display(),
                count
            );
        }
        FileOutcome::Cancelled => {
            summary.skipped += 1;
        }
    }
}

async fn process_file(
    path: &Path,
    fetcher: &Fetcher,
    default_eol: EndOfLine,
) -> Result<FileOutcome> {
    if is_manifest(path) {
        match apply_manifest(path, fetcher).await {
            Ok(count) => return Ok(FileOutcome::ManifestApplied(count)),
            // A file that happens to carry the manifest name but does not
            // parse as one is scanned for blocks like any other file.
            Err(refsync_fetch::Error::Manifest { path, message }) => {
                tracing::debug!(file = %path.display(), %message, "not a manifest, scanning for blocks");
            }
            Err(error) => return Err(error.into()),
        }
    }

    let (content, encoding) = refsync_fs::read_text(path)?;
    let mut matcher = matcher_for_path(path);
    match rewrite(path, &content, matcher.as_mut(), fetcher, default_eol).await? {
        Rewrite::Unchanged => Ok(FileOutcome::NoReferences),
        Rewrite::UpToDate => Ok(FileOutcome::UpToDate),
        Rewrite::Updated(new_content) => {
            refsync_fs::write_text(path, &new_content, encoding)?;
            Ok(FileOutcome::Updated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run_on(dir: &TempDir) -> RunSummary {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime
            .block_on(run(
                &[dir.path().to_path_buf()],
                true,
                EndOfLine::Auto,
                CancellationToken::new(),
            ))
            .unwrap()
    }

    #[test]
    fn test_updates_stale_block_and_reports_up_to_date_on_rerun() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ref1.txt"), "ref1").unwrap();
        fs::write(dir.path().join("a.cs"), "// ref:ref1.txt\n// endref\n").unwrap();

        let first = run_on(&dir);
        assert_eq!(first.updated, 1);
        assert_eq!(first.failed, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.cs")).unwrap(),
            "// ref:ref1.txt\nref1\n// endref\n"
        );

        let second = run_on(&dir);
        assert_eq!(second.updated, 0);
        assert_eq!(second.up_to_date, 1);
    }

    #[test]
    fn test_one_failing_file_does_not_abort_others() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ref1.txt"), "ref1").unwrap();
        fs::write(dir.path().join("good.yml"), "# ref:ref1.txt\n# endref\n").unwrap();
        fs::write(dir.path().join("bad.yml"), "# ref:missing.txt\n# endref\n").unwrap();

        let summary = run_on(&dir);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("good.yml")).unwrap(),
            "# ref:ref1.txt\nref1\n# endref\n"
        );
    }

    #[test]
    fn test_files_without_markers_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain.rs"), "fn main() {}\n").unwrap();

        let summary = run_on(&dir);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_manifest_file_is_applied() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("refs")).unwrap();
        fs::write(dir.path().join("refs/LICENSE.txt"), "dummy").unwrap();
        fs::write(
            dir.path().join("FileReferences.json"),
            r#"{"references": {"LICENSE.txt": {"ref": "./refs/LICENSE.txt"}}}"#,
        )
        .unwrap();

        let summary = run_on(&dir);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("LICENSE.txt")).unwrap(),
            "dummy"
        );
    }

    #[test]
    fn test_cancelled_token_processes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ref1.txt"), "ref1").unwrap();
        fs::write(dir.path().join("a.cs"), "// ref:ref1.txt\n// endref\n").unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let summary = runtime
            .block_on(run(&[dir.path().to_path_buf()], true, EndOfLine::Auto, token))
            .unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.updated, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.cs")).unwrap(),
            "// ref:ref1.txt\n// endref\n"
        );
    }
}
