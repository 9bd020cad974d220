//! Input discovery
//!
//! Resolves the newest CSV under an ordered list of directories. Listing is
//! kept apart from ranking so the ordering rule can be tested without a
//! filesystem.

use crate::error::PipelineError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// A CSV file found in one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Newest first; equal modification times fall back to path order
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.path.cmp(&b.path))
    });
    candidates
}

/// Regular, non-hidden `*.csv` files directly inside `dir`; a missing directory is empty
pub fn list_candidates(dir: &Path) -> Result<Vec<Candidate>, PipelineError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().map_or(true, |ext| ext != "csv") || is_hidden(&path) {
            continue;
        }
        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            continue;
        }
        candidates.push(Candidate {
            path,
            modified: metadata.modified()?,
        });
    }
    Ok(candidates)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.'))
}

/// Newest CSV in the first directory of `dirs` that holds any
pub fn discover_latest(dirs: &[PathBuf]) -> Result<PathBuf, PipelineError> {
    for dir in dirs {
        let ranked = rank_candidates(list_candidates(dir)?);
        debug!("{} CSV candidates in {}", ranked.len(), dir.display());
        if let Some(latest) = ranked.into_iter().next() {
            info!("Using latest CSV: {}", latest.path.display());
            return Ok(latest.path);
        }
    }
    Err(PipelineError::InputNotFound {
        searched: dirs.to_vec(),
    })
}

/// Newest training set extract in `dir`, as a downstream feature store resolves it
pub fn latest_training_set(dir: &Path) -> Result<Option<PathBuf>, PipelineError> {
    Ok(rank_candidates(list_candidates(dir)?)
        .into_iter()
        .next()
        .map(|c| c.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::time::Duration;

    fn candidate(path: &str, secs: u64) -> Candidate {
        Candidate {
            path: PathBuf::from(path),
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    fn touch(path: &Path, secs: i64) {
        fs::write(path, "a\n1\n").unwrap();
        set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    #[test]
    fn test_rank_newest_first_then_path() {
        let ranked = rank_candidates(vec![
            candidate("b.csv", 10),
            candidate("c.csv", 20),
            candidate("a.csv", 10),
        ]);
        let paths: Vec<_> = ranked.iter().map(|c| c.path.to_str().unwrap()).collect();
        assert_eq!(paths, vec!["c.csv", "a.csv", "b.csv"]);
    }

    #[test]
    fn test_list_only_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("data.csv"), 100);
        touch(&dir.path().join("notes.txt"), 200);
        touch(&dir.path().join(".partial.csv"), 300);
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let candidates = list_candidates(dir.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, dir.path().join("data.csv"));
    }

    #[test]
    fn test_first_directory_with_candidates_wins() {
        let root = tempfile::tempdir().unwrap();
        let cleaned = root.path().join("cleaned");
        let processed = root.path().join("processed");
        fs::create_dir_all(&cleaned).unwrap();
        fs::create_dir_all(&processed).unwrap();
        touch(&cleaned.join("old.csv"), 100);
        touch(&cleaned.join("new.csv"), 200);
        touch(&processed.join("newest.csv"), 300);

        let latest = discover_latest(&[cleaned.clone(), processed.clone()]).unwrap();
        assert_eq!(latest, cleaned.join("new.csv"));

        // An empty or absent first directory falls through
        let latest = discover_latest(&[root.path().join("missing"), processed.clone()]).unwrap();
        assert_eq!(latest, processed.join("newest.csv"));
    }

    #[test]
    fn test_nothing_found() {
        let root = tempfile::tempdir().unwrap();
        let dirs = vec![root.path().join("cleaned"), root.path().join("processed")];
        match discover_latest(&dirs) {
            Err(PipelineError::InputNotFound { searched }) => assert_eq!(searched, dirs),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(latest_training_set(root.path()).unwrap(), None);
    }
}
