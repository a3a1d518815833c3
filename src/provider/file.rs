use std::fs;
use std::path::{Path, PathBuf};

use super::{ContributionResponse, ContributionSource, Error, ErrorKind, Result};

/// A contributions API response saved to disk.
pub struct FileContributions {
    path: PathBuf,
    name: String,
}

impl FileContributions {
    pub fn new(path: &Path) -> Self {
        FileContributions {
            path: path.to_owned(),
            name: path.display().to_string(),
        }
    }
}

impl ContributionSource for FileContributions {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<ContributionResponse> {
        let body = fs::read_to_string(&self.path).map_err(|e| {
            Error::new(
                ErrorKind::FetchFailure,
                &format!("Could not read {}: {}", self.path.display(), e),
            )
        })?;

        ContributionResponse::from_json(&body)
    }
}
