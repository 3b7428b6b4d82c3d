use std::{fs, io::ErrorKind, path::PathBuf};

use anyhow::Context as _;

/// Persists the highest score as a decimal integer in a plain text file.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the stored score. A missing file is an empty record (0), not
    /// an error; an unreadable or malformed file is.
    pub fn load(&self) -> anyhow::Result<usize> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read score file: {}", self.path.display())
                });
            }
        };
        contents
            .trim()
            .parse()
            .with_context(|| format!("score file is not a number: {}", self.path.display()))
    }

    /// Writes the score, creating the parent directory when needed.
    pub fn save(&self, score: usize) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create score directory: {}", parent.display())
            })?;
        }
        fs::write(&self.path, format!("{score}\n"))
            .with_context(|| format!("failed to write score file: {}", self.path.display()))
    }
}
