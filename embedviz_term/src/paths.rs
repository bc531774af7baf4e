//! Cross-platform application paths

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, String> {
        let base = dirs::config_dir().ok_or("Could not determine config directory")?;
        Ok(Self {
            config_dir: base.join("embedviz"),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_in_app_dir() {
        if let Ok(paths) = AppPaths::new() {
            let file = paths.config_file();
            assert!(file.ends_with("embedviz/config.json"));
        }
    }
}
