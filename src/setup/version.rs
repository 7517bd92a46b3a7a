//! Version comparison and migration logic.
//!
//! Handles checking if setup is needed by comparing embedded version with config file version.

use anyhow::anyhow;
use regex::Regex;
use std::cmp::Ordering;
use std::path::Path;

/// Current application version from Cargo.toml
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A `major.minor.patch` version, ordered field by field.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
struct SemanticVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl SemanticVersion {
    fn parse(version_str: &str) -> anyhow::Result<Self> {
        let parts = version_str
            .trim()
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| anyhow!("Invalid version component '{part}' in '{version_str}'"))
            })
            .collect::<anyhow::Result<Vec<u32>>>()?;

        match parts.as_slice() {
            &[major, minor, patch] => Ok(SemanticVersion {
                major,
                minor,
                patch,
            }),
            _ => Err(anyhow!(
                "Invalid version format: '{version_str}'. Expected 'major.minor.patch'"
            )),
        }
    }
}

/// Reads `config_version = "X.Y.Z"` from the first line of the config file.
///
/// Commented-out lines, empty files and files without the line yield `None`.
///
/// # Errors
/// Returns an error if the file can't be read.
fn read_config_version_from_file(config_path: &Path) -> anyhow::Result<Option<String>> {
    let content = std::fs::read_to_string(config_path)?;
    let Some(first_line) = content.lines().next() else {
        return Ok(None);
    };

    let regex = Regex::new(r#"^\s*config_version\s*=\s*"([^"]+)""#)?;
    if let Some(caps) = regex.captures(first_line) {
        return Ok(Some(caps[1].to_string()));
    }

    Ok(None)
}

/// Outcome of comparing the config file against the running binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStatus {
    /// No config file yet
    Missing,
    /// Config written by an older release (or without a version line)
    Outdated(String),
    /// Config matches this release
    Current,
}

/// Determines if setup is needed by checking version and config file existence.
///
/// # Errors
/// Returns an error if the file can't be read or a version fails to parse.
pub fn check_setup_needed(config_path: &Path) -> anyhow::Result<SetupStatus> {
    if !config_path.exists() {
        return Ok(SetupStatus::Missing);
    }

    let Some(config_version) = read_config_version_from_file(config_path)? else {
        return Ok(SetupStatus::Outdated("unknown (legacy config)".to_string()));
    };

    let config_parsed = SemanticVersion::parse(&config_version)?;
    let current_parsed = SemanticVersion::parse(CURRENT_VERSION)?;

    match config_parsed.cmp(&current_parsed) {
        Ordering::Less => Ok(SetupStatus::Outdated(config_version)),
        Ordering::Equal => Ok(SetupStatus::Current),
        Ordering::Greater => {
            // Don't block startup on a config from a newer release
            tracing::warn!(
                "Config version {} is newer than app version {}",
                config_version,
                CURRENT_VERSION
            );
            Ok(SetupStatus::Current)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_version_parse() {
        let v = SemanticVersion::parse("0.0.5").unwrap();
        assert_eq!(v.major, 0);
        assert_eq!(v.minor, 0);
        assert_eq!(v.patch, 5);
    }

    #[test]
    fn test_semantic_version_comparison() {
        let v1 = SemanticVersion::parse("0.0.4").unwrap();
        let v2 = SemanticVersion::parse("0.0.5").unwrap();
        let v3 = SemanticVersion::parse("0.1.0").unwrap();

        assert!(v1 < v2);
        assert!(v2 < v3);
        assert_eq!(v1, v1.clone());
    }

    #[test]
    fn test_missing_and_legacy_configs() {
        let dir = std::env::temp_dir().join(format!("siriwave_version_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("siriwave.toml");
        let _ = std::fs::remove_file(&config_path);

        assert_eq!(check_setup_needed(&config_path).unwrap(), SetupStatus::Missing);

        std::fs::write(&config_path, "[wave]\nwaves = 2\n").unwrap();
        assert!(matches!(
            check_setup_needed(&config_path).unwrap(),
            SetupStatus::Outdated(_)
        ));

        std::fs::write(&config_path, "# config_version = \"99.0.0\"\n").unwrap();
        assert!(matches!(
            check_setup_needed(&config_path).unwrap(),
            SetupStatus::Outdated(_)
        ));

        std::fs::write(&config_path, "config_version = \"99.0.0\"\n").unwrap();
        assert_eq!(check_setup_needed(&config_path).unwrap(), SetupStatus::Current);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_version_format() {
        assert!(SemanticVersion::parse("0.0").is_err());
        assert!(SemanticVersion::parse("0.0.5.1").is_err());
        assert!(SemanticVersion::parse("invalid").is_err());
    }
}
