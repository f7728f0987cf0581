use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Bearer token issued by the identity provider, kept in a file between runs.
pub struct TokenManager {
    token_path: PathBuf,
}

impl TokenManager {
    pub fn new(token_path: PathBuf) -> Self {
        Self { token_path }
    }

    pub fn path(&self) -> &Path {
        &self.token_path
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        fs::write(&self.token_path, token.trim())
            .with_context(|| format!("Failed to save token to {:?}", self.token_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms)?;
        }

        Ok(())
    }

    pub fn load_token(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read token file"),
        }
    }

    /// Returns whether there was a token to remove.
    pub fn clear_token(&self) -> Result<bool> {
        match fs::remove_file(&self.token_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove token file {:?}", self.token_path)),
        }
    }
}

/// Shortened form for display; tokens are never printed in full.
pub fn preview(token: &str) -> String {
    let head: String = token.chars().take(12).collect();
    if head.len() < token.len() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TokenManager::new(dir.path().join("nested").join("token"));

        assert_eq!(manager.load_token().unwrap(), None);
        manager.save_token(" abc.def \n").unwrap();
        assert_eq!(manager.load_token().unwrap().as_deref(), Some("abc.def"));

        assert!(manager.clear_token().unwrap());
        assert!(!manager.clear_token().unwrap());
        assert_eq!(manager.load_token().unwrap(), None);
    }

    #[test]
    fn preview_truncates_long_tokens() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("abcdefghijklmnop"), "abcdefghijkl...");
    }
}
