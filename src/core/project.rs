//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-project data directory
pub const PROJECT_DIR: &str = ".bomq";

/// Represents a bomq project: a directory holding `.bomq/`
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (parent of .bomq/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use `--project` if given, otherwise discover from the current directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ProjectError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_structure(root)
    }

    /// Initialize even if .bomq/ exists; an existing config is kept
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(root)
    }

    fn create_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let data_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(data_dir.join("selections"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = data_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# bomq project configuration

# Labor cost per person billed on a quotation
# labor_rate: 10000

# Currency label printed after every amount
# currency: KRW

# Cover block of exported quotations
# customer: ""
# project_name: ""
# delivery_terms: "Delivered to customer site"
# lead_time: "To be agreed"
# payment_terms: "To be agreed"
# validity: "30 days from quotation date"

# Default output format for `bomq quote build` (csv, md, json)
# default_format: md
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .bomq data directory
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// SQLite catalog database
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir().join("catalog.db")
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir().join("config.yaml")
    }

    /// Directory for saved selection files
    pub fn selections_dir(&self) -> PathBuf {
        self.data_dir().join("selections")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a bomq project (searched from {searched_from:?}). Run 'bomq init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("bomq project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.data_dir().is_dir());
        assert!(project.config_path().exists());
        assert!(project.selections_dir().is_dir());
        assert!(!project.catalog_path().exists());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_init_force_keeps_config() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.config_path(), "labor_rate: 5\n").unwrap();

        let project = Project::init_force(tmp.path()).unwrap();
        let contents = std::fs::read_to_string(project.config_path()).unwrap();
        assert_eq!(contents, "labor_rate: 5\n");
    }

    #[test]
    fn test_project_discover_finds_data_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("quotes/2024");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_data_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
