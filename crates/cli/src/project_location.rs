use std::path::{Path, PathBuf};

use exdeploy_core::{read, SetupConfig};

use crate::commands::error::ProjectLocationError;

pub const SETUP_CONFIG_FILE: &str = "exdeploy.yaml";

#[derive(Debug, Clone)]
pub struct ProjectLocation {
    output_dir: PathBuf,
}

impl ProjectLocation {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Directory artifact and source paths in the config are relative to.
    pub fn project_root(&self) -> &Path {
        &self.output_dir
    }

    pub fn setup_config(&self) -> Result<SetupConfig, ProjectLocationError> {
        read(&self.output_dir.join(SETUP_CONFIG_FILE)).map_err(|e| {
            ProjectLocationError::ProjectConfig(format!(
                "Failed to read config (are you in the project root, where the {} is?): {}",
                SETUP_CONFIG_FILE, e
            ))
        })
    }
}
