use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Where raw config text lives. `Ok(None)` means "nothing stored yet".
pub trait ConfigContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, String>;
    fn set_config_content(&self, content: &str) -> Result<(), String>;
}

pub struct FileContentConfigProvider {
    file_path: PathBuf,
}

impl FileContentConfigProvider {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(&self.file_path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!(
                "Failed to read config file {}: {}",
                self.file_path.display(),
                err
            )),
        }
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        std::fs::write(&self.file_path, content).map_err(|e| {
            format!(
                "Failed to write config file {}: {}",
                self.file_path.display(),
                e
            )
        })
    }
}

#[derive(Default)]
pub struct MemoryContentConfigProvider {
    content: Mutex<Option<String>>,
}

impl MemoryContentConfigProvider {
    pub fn with_content(content: &str) -> Self {
        Self {
            content: Mutex::new(Some(content.to_string())),
        }
    }
}

impl ConfigContentProvider for MemoryContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        let guard = self
            .content
            .lock()
            .map_err(|_| "config content lock poisoned".to_string())?;
        Ok(guard.clone())
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        let mut guard = self
            .content
            .lock()
            .map_err(|_| "config content lock poisoned".to_string())?;
        *guard = Some(content.to_string());
        Ok(())
    }
}
