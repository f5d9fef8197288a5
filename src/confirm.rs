use std::path::Path;

use inquire::Confirm;

use crate::error::CompileError;

/// What to do when a write would clobber an existing file.
pub enum OverwritePolicy {
    /// Replace without asking (`--overwrite`).
    Allow,
    /// Refuse outright (non-interactive runs).
    Deny,
    /// Ask the operator.
    Prompt,
}

impl OverwritePolicy {
    pub fn check(&self, path: &Path) -> Result<(), CompileError> {
        if !path.exists() {
            return Ok(());
        }
        let allowed = match self {
            OverwritePolicy::Allow => true,
            OverwritePolicy::Deny => false,
            OverwritePolicy::Prompt => {
                let question = format!("{} already exists. Overwrite?", path.display());
                // A failed prompt (closed stdin, ctrl-c) counts as a refusal
                Confirm::new(&question)
                    .with_default(false)
                    .prompt()
                    .unwrap_or(false)
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(CompileError::DestinationExists {
                path: path.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_destinations_need_no_consent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.png");
        assert!(OverwritePolicy::Allow.check(&path).is_ok());
        assert!(OverwritePolicy::Deny.check(&path).is_ok());
        assert!(OverwritePolicy::Prompt.check(&path).is_ok());
    }

    #[test]
    fn deny_refuses_an_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken.png");
        std::fs::write(&path, b"old").unwrap();
        let err = OverwritePolicy::Deny.check(&path).unwrap_err();
        assert!(matches!(err, CompileError::DestinationExists { .. }));
    }

    #[test]
    fn allow_accepts_an_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken.png");
        std::fs::write(&path, b"old").unwrap();
        assert!(OverwritePolicy::Allow.check(&path).is_ok());
    }
}
