//! Shared YAML/JSON loading.
//!
//! Manifests, table settings and engine limits are all plain serde types
//! read from disk. Every loader maps a missing file to
//! [`PackError::FileNotFound`] and a parse failure to the format-specific
//! variant carrying the path, so callers report configuration problems
//! uniformly.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{PackError, PackResult};

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> PackResult<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(PackError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn read_to_string(path: &Path) -> PackResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PackError::Io(e)
        }
    })
}

/// Load a YAML file into a strongly-typed struct.
pub fn load_yaml_typed<T: DeserializeOwned>(path: &Path) -> PackResult<T> {
    let content = read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| PackError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a JSON file into a strongly-typed struct.
pub fn load_json_typed<T: DeserializeOwned>(path: &Path) -> PackResult<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| PackError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a YAML or JSON file, chosen by extension.
pub fn load_typed<T: DeserializeOwned>(path: &Path) -> PackResult<T> {
    match Format::from_path(path)? {
        Format::Yaml => load_yaml_typed(path),
        Format::Json => load_json_typed(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        id: String,
        #[serde(default)]
        enabled: bool,
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn format_detection() {
        assert_eq!(Format::from_path(Path::new("a.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert!(matches!(
            Format::from_path(Path::new("a.toml")),
            Err(PackError::UnsupportedFormat { .. })
        ));
        assert!(Format::from_path(Path::new("sem_extensao")).is_err());
    }

    #[test]
    fn load_yaml_typed_reads_struct() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "s.yaml", "id: sp-base\nenabled: true\n");
        let s: Sample = load_yaml_typed(&path).unwrap();
        assert_eq!(
            s,
            Sample {
                id: "sp-base".into(),
                enabled: true
            }
        );
    }

    #[test]
    fn load_json_typed_reads_struct() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "s.json", r#"{"id": "sp-oficial"}"#);
        let s: Sample = load_json_typed(&path).unwrap();
        assert_eq!(s.id, "sp-oficial");
        assert!(!s.enabled);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nao_existe.yaml");
        let err = load_typed::<Sample>(&path).unwrap_err();
        assert!(matches!(err, PackError::FileNotFound { .. }));
    }

    #[test]
    fn bad_yaml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.yaml", "id: [unclosed\n");
        let err = load_typed::<Sample>(&path).unwrap_err();
        match err {
            PackError::YamlParse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected YamlParse, got {other:?}"),
        }
    }

    #[test]
    fn bad_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.json", "{ not json");
        assert!(matches!(
            load_typed::<Sample>(&path),
            Err(PackError::JsonParse { .. })
        ));
    }
}
