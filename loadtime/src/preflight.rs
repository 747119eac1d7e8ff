//! Pre-flight checks for loadtime
//!
//! Validates arguments before anything is loaded, with actionable messages.
//! A bad search path would otherwise surface as a confusing "No unit named"
//! failure from deep inside the resolution chain.

use crate::script::directive::is_unit_name;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Run all pre-flight checks before loading the root unit
pub fn run_preflight_checks(unit: &str, search_paths: &[PathBuf]) -> Result<()> {
    check_unit_name(unit)?;
    check_search_paths(search_paths)?;
    Ok(())
}

/// Check that the root unit name is a dotted path of identifiers
fn check_unit_name(unit: &str) -> Result<()> {
    if !is_unit_name(unit) {
        bail!(
            "Invalid unit name: '{unit}'\n\n\
             Unit names are dotted paths such as 'app' or 'app.cli.main'."
        );
    }
    Ok(())
}

/// Check that every search path exists and is a directory
fn check_search_paths(search_paths: &[PathBuf]) -> Result<()> {
    if search_paths.is_empty() {
        bail!("No search paths given.\n\nPass at least one --path DIR.");
    }
    for path in search_paths {
        if !path.exists() {
            bail!(
                "Search path not found: {}\n\n\
                 Make sure the directory exists.",
                path.display()
            );
        }
        if !path.is_dir() {
            bail!(
                "Not a directory: {}\n\n\
                 --path must point to a directory containing unit scripts.",
                path.display()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_unit_names() {
        assert!(check_unit_name("app").is_ok());
        assert!(check_unit_name("app.cli_v2.main").is_ok());
    }

    #[test]
    fn test_invalid_unit_names() {
        for name in ["", ".app", "app.", "app..cli", "app-cli", "app/cli"] {
            let err = check_unit_name(name).unwrap_err().to_string();
            assert!(err.contains("Invalid unit name"), "{name}: {err}");
        }
    }

    #[test]
    fn test_search_path_not_found() {
        let result = check_search_paths(&[PathBuf::from("/nonexistent/units")]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Search path not found"));
    }

    #[test]
    fn test_search_path_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = check_search_paths(&[file.path().to_path_buf()]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Not a directory"));
    }

    #[test]
    fn test_no_search_paths() {
        assert!(check_search_paths(&[]).is_err());
    }
}
