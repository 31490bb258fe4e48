use glob::{glob, Pattern};
use std::time::SystemTime;

use crate::report::*;

/// Finds the most recently modified file with the given extension in a directory.
///
/// Files with the same modification time are ordered by name, and the last
/// name wins. Fails if no file matches.
pub fn find_latest_input(dir: &Path, extension: &str) -> RpResult<PathBuf> {
    // The directory is matched literally, even if it holds glob metacharacters.
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.display().to_string()),
        extension
    );
    debug!("find_latest_input: looking for {}", pattern);
    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in glob(&pattern).context(InputPatternSnafu {
        pattern: pattern.clone(),
    })? {
        match entry {
            Ok(path) => {
                let modified = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                candidates.push((modified, path));
            }
            Err(e) => warn!("find_latest_input: skipping {:?}", e),
        }
    }
    candidates.sort_by(|a, b| b.cmp(a));
    match candidates.into_iter().next() {
        Some((_, path)) => {
            info!("find_latest_input: using {:?}", path.display());
            Ok(path)
        }
        None => InputMissingSnafu { pattern }.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let p = dir.join(name);
        let f = File::create(&p).unwrap();
        f.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        p
    }

    #[test]
    fn newest_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.csv", 300);
        let newest = touch(dir.path(), "b.csv", 10);
        touch(dir.path(), "c.csv", 100);
        touch(dir.path(), "d.xlsx", 1);
        assert_eq!(find_latest_input(dir.path(), "csv").unwrap(), newest);
    }

    #[test]
    fn ties_are_broken_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let t = SystemTime::now() - Duration::from_secs(60);
        for name in ["survey_1.csv", "survey_3.csv", "survey_2.csv"] {
            File::create(dir.path().join(name))
                .unwrap()
                .set_modified(t)
                .unwrap();
        }
        assert_eq!(
            find_latest_input(dir.path(), "csv").unwrap(),
            dir.path().join("survey_3.csv")
        );
    }

    #[test]
    fn directory_with_brackets() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Survey [2023]");
        fs::create_dir(&dir).unwrap();
        let export = touch(&dir, "export.csv", 5);
        assert_eq!(find_latest_input(&dir, "csv").unwrap(), export);
    }

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt", 0);
        assert!(matches!(
            find_latest_input(dir.path(), "csv"),
            Err(ReportError::InputMissing { .. })
        ));
    }
}
