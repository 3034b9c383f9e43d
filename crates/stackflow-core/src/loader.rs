//! 入力ローダー
//!
//! ３層の設定入力（カタログYAML・ポートオーバーライドYAML・有効化INI）と
//! 前回実行の `.env` を読み込みます。
//!
//! 欠落の扱いは層ごとに異なります:
//! - カタログ欠落 → 致命的エラー
//! - 有効化設定欠落 → 致命的エラー（黙って全サービス無効になるのを防ぐ）
//! - ポートオーバーライド欠落 → 「オーバーライドなし」として続行
//! - `.env` 欠落 → 空の初期状態として続行

use crate::error::{Result, StackError};
use crate::model::{Catalog, PortOverrides};
use config::{Config, File, FileFormat};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, instrument};

/// サービスカタログを読み込む
///
/// 読み込み・パースのいずれの失敗も `MissingCatalog` として致命的です。
#[instrument]
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path).map_err(|e| StackError::MissingCatalog {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let catalog: Catalog =
        serde_yaml::from_str(&content).map_err(|e| StackError::MissingCatalog {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    info!(services = catalog.services.len(), "Loaded service catalog");
    Ok(catalog)
}

/// ポートオーバーライドを読み込む
///
/// ファイルが存在しない場合は空のオーバーライドを返します（エラーではない）。
/// 存在するのにパースできない場合はエラーです。
#[instrument]
pub fn load_port_overrides(path: &Path) -> Result<PortOverrides> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No port override file, using empty overrides");
            return Ok(PortOverrides::default());
        }
        Err(e) => {
            return Err(StackError::IoError {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    let overrides: PortOverrides = serde_yaml::from_str(&content)?;
    info!(services = overrides.services.len(), "Loaded port overrides");
    Ok(overrides)
}

/// 有効化セットを読み込む
///
/// INI形式の `[services]` セクションで、値が文字列 `enabled` のキーが
/// 「有効」を意味します。ファイルが読めない場合は致命的エラーです。
#[instrument]
pub fn load_enablement(path: &Path) -> Result<BTreeMap<String, bool>> {
    let cfg = Config::builder()
        .add_source(File::from(path.to_path_buf()).format(FileFormat::Ini))
        .build()
        .map_err(|e| StackError::MissingEnablement {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // セクション自体がない場合は「何も有効化されていない」扱い
    let section = cfg.get_table("services").unwrap_or_default();

    let mut enabled = BTreeMap::new();
    for (name, value) in section {
        let is_enabled = value
            .into_string()
            .map(|v| v == "enabled")
            .unwrap_or(false);
        if is_enabled {
            enabled.insert(name, true);
        }
    }

    info!(enabled = enabled.len(), "Loaded enablement set");
    Ok(enabled)
}

/// 前回実行の `.env` を読み込む
///
/// `name=value` の行指向形式。ファイルが存在しない場合は空の状態を返します。
/// 空行・コメント行・`=` を含まない行はスキップされます。
#[instrument]
pub fn load_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No env file, starting with empty state");
            return Ok(BTreeMap::new());
        }
        Err(e) => {
            return Err(StackError::IoError {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    let mut env = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            env.insert(key.trim().to_string(), value.to_string());
        }
    }

    info!(variables = env.len(), "Loaded persisted env file");
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_catalog_basic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("services.yaml");
        fs::write(
            &path,
            r#"
services:
  api:
    image: app
    version: "1.0"
"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.services.len(), 1);
        assert_eq!(catalog.services["api"].image, "app");
    }

    #[test]
    fn test_load_catalog_missing_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_catalog(&temp_dir.path().join("nope.yaml"));

        assert!(matches!(result, Err(StackError::MissingCatalog { .. })));
    }

    #[test]
    fn test_load_catalog_unparsable_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("services.yaml");
        fs::write(&path, "services: [not: a: mapping").unwrap();

        let result = load_catalog(&path);
        assert!(matches!(result, Err(StackError::MissingCatalog { .. })));
    }

    #[test]
    fn test_load_port_overrides_missing_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let overrides = load_port_overrides(&temp_dir.path().join("ports.yaml")).unwrap();

        // 欠落はエラーではなく「オーバーライドなし」
        assert!(overrides.services.is_empty());
    }

    #[test]
    fn test_load_port_overrides_basic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("ports.yaml");
        fs::write(
            &path,
            r#"
services:
  api:
    - "9090:80"
"#,
        )
        .unwrap();

        let overrides = load_port_overrides(&path).unwrap();
        assert_eq!(overrides.services["api"], vec!["9090:80".to_string()]);
    }

    #[test]
    fn test_load_enablement_basic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plugins.conf");
        fs::write(
            &path,
            r#"
[services]
api = enabled
worker = disabled
web = enabled
"#,
        )
        .unwrap();

        let enabled = load_enablement(&path).unwrap();
        assert_eq!(enabled.get("api"), Some(&true));
        assert_eq!(enabled.get("web"), Some(&true));
        // "enabled" 以外の値は有効化しない
        assert_eq!(enabled.get("worker"), None);
    }

    #[test]
    fn test_load_enablement_missing_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_enablement(&temp_dir.path().join("plugins.conf"));

        assert!(matches!(result, Err(StackError::MissingEnablement { .. })));
    }

    #[test]
    fn test_load_env_file_roundtrip_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(".env");
        fs::write(
            &path,
            "# generated\nDB_PASS=cafebabe\nEMPTY=\nDATABASE_URL=postgres://u:p@db/app\n\nbroken-line\n",
        )
        .unwrap();

        let env = load_env_file(&path).unwrap();
        assert_eq!(env["DB_PASS"], "cafebabe");
        assert_eq!(env["EMPTY"], "");
        // 値側の '=' は保持される
        assert_eq!(env["DATABASE_URL"], "postgres://u:p@db/app");
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn test_load_env_file_missing_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let env = load_env_file(&temp_dir.path().join(".env")).unwrap();
        assert!(env.is_empty());
    }
}
