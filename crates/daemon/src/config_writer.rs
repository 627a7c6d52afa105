//! DaemonConfigWriter - Merge the mirror list into the daemon configuration file

use serde::Serialize;
use serde_json::{Map, Value};
use shared::{ConfigWriteError, MirrorEndpoint, REGISTRY_MIRRORS_KEY};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What the writer found on disk before updating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorConfig {
    /// No file; a new one was created
    Missing,
    /// Existing settings were kept
    Loaded,
    /// The file was not a JSON object; its settings were discarded
    Corrupt,
}

/// Summary of a successful update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub mirror_count: usize,
    pub prior: PriorConfig,
}

/// Daemon configuration writer
///
/// Only `registry-mirrors` is touched; other keys are passed through as long
/// as the existing file parses. The file is overwritten in place.
#[derive(Debug, Clone)]
pub struct DaemonConfigWriter {
    path: PathBuf,
}

impl DaemonConfigWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current configuration, starting fresh when it is absent or corrupt
    pub fn load(&self) -> Result<(Map<String, Value>, PriorConfig), ConfigWriteError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((Map::new(), PriorConfig::Missing)),
            Err(e) => {
                return Err(ConfigWriteError::Read {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => {
                info!("Loaded existing daemon configuration from {}", self.path.display());
                Ok((map, PriorConfig::Loaded))
            }
            Ok(_) => {
                warn!("{} is not a JSON object, creating a new configuration", self.path.display());
                Ok((Map::new(), PriorConfig::Corrupt))
            }
            Err(e) => {
                warn!("{} is malformed ({}), creating a new configuration", self.path.display(), e);
                Ok((Map::new(), PriorConfig::Corrupt))
            }
        }
    }

    /// Set `registry-mirrors` and write the configuration back
    pub fn write_mirrors(&self, mirrors: &[MirrorEndpoint]) -> Result<WriteReport, ConfigWriteError> {
        let (mut config, prior) = self.load()?;

        config.insert(REGISTRY_MIRRORS_KEY.to_string(), serde_json::to_value(mirrors)?);

        let rendered = render(&config)?;
        std::fs::write(&self.path, rendered).map_err(|e| ConfigWriteError::Write {
            path: self.path.display().to_string(),
            source: e,
        })?;

        info!("Updated {} with {} mirrors", self.path.display(), mirrors.len());

        Ok(WriteReport {
            path: self.path.clone(),
            mirror_count: mirrors.len(),
            prior,
        })
    }
}

/// Pretty-print with four-space indentation and a trailing newline
fn render(config: &Map<String, Value>) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mirrors(urls: &[&str]) -> Vec<MirrorEndpoint> {
        urls.iter().copied().map(MirrorEndpoint::from).collect()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_existing_keys_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        std::fs::write(&path, r#"{"x": 1}"#).unwrap();

        let report = DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a", "b"])).unwrap();

        assert_eq!(report.prior, PriorConfig::Loaded);
        assert_eq!(report.mirror_count, 2);
        assert_eq!(read_json(&path), json!({"x": 1, "registry-mirrors": ["a", "b"]}));
    }

    #[test]
    fn test_previous_mirrors_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        std::fs::write(
            &path,
            r#"{"log-driver": "json-file", "registry-mirrors": ["https://old"], "debug": true}"#,
        )
        .unwrap();

        DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["https://new"])).unwrap();

        let written = read_json(&path);
        assert_eq!(written["registry-mirrors"], json!(["https://new"]));
        assert_eq!(written["log-driver"], json!("json-file"));
        assert_eq!(written["debug"], json!(true));

        let keys: Vec<&String> = written.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["log-driver", "registry-mirrors", "debug"]);
    }

    #[test]
    fn test_big_numbers_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        std::fs::write(&path, r#"{"x": 123456789012345678901234567890, "y": 1.10}"#).unwrap();

        let report = DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a"])).unwrap();

        assert_eq!(report.prior, PriorConfig::Loaded);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""x": 123456789012345678901234567890"#), "{}", content);
        assert!(content.contains(r#""y": 1.10"#), "{}", content);
    }

    #[test]
    fn test_out_of_range_float_is_not_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        std::fs::write(&path, r#"{"debug": true, "z": 1e400}"#).unwrap();

        let report = DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a"])).unwrap();

        assert_eq!(report.prior, PriorConfig::Loaded);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""debug": true"#), "{}", content);
        assert!(content.contains(r#""z": 1e400"#), "{}", content);
        assert!(content.contains(r#""registry-mirrors""#), "{}", content);
    }

    #[test]
    fn test_corrupt_file_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        std::fs::write(&path, r#"{"x": 1,"#).unwrap();

        let report = DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a"])).unwrap();

        assert_eq!(report.prior, PriorConfig::Corrupt);
        assert_eq!(read_json(&path), json!({"registry-mirrors": ["a"]}));
    }

    #[test]
    fn test_non_object_treated_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let report = DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a"])).unwrap();

        assert_eq!(report.prior, PriorConfig::Corrupt);
        assert_eq!(read_json(&path), json!({"registry-mirrors": ["a"]}));
    }

    #[test]
    fn test_missing_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");

        let report = DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a", "b"])).unwrap();

        assert_eq!(report.prior, PriorConfig::Missing);
        assert_eq!(read_json(&path), json!({"registry-mirrors": ["a", "b"]}));
    }

    #[test]
    fn test_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.json");

        DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a"])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n    \"registry-mirrors\": [\n        \"a\"\n    ]\n}\n");
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("daemon.json");

        let err = DaemonConfigWriter::new(&path).write_mirrors(&mirrors(&["a"])).unwrap_err();
        assert!(matches!(err, ConfigWriteError::Write { .. }));
    }

    #[test]
    fn test_unreadable_path_fails() {
        let dir = tempfile::tempdir().unwrap();

        // A directory cannot be read as a file.
        let err = DaemonConfigWriter::new(dir.path()).write_mirrors(&mirrors(&["a"])).unwrap_err();
        assert!(matches!(err, ConfigWriteError::Read { .. }));
    }
}
