//! 出力ライター
//!
//! `.env` と compose 記述子を毎回まるごと書き直します。
//! 呼び出し側はパイプライン全体の成功後にのみ書き込むこと
//! （途中失敗時はディスク上の前回の有効な状態を保持する）。

use crate::model::ComposeFile;
use stackflow_core::env::FlatEnv;
use stackflow_core::error::{Result, StackError};
use std::path::Path;
use tracing::info;

/// フラットな環境変数表を `name=value` 行形式で書き出す
///
/// キー順に並ぶため、同じ入力からは常にバイト同一の出力になります。
pub fn write_env_file(path: &Path, flat: &FlatEnv) -> Result<()> {
    let mut content = String::new();
    for (name, value) in flat {
        content.push_str(name);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }

    std::fs::write(path, content).map_err(|e| StackError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(path = %path.display(), variables = flat.len(), "Wrote env file");
    Ok(())
}

/// compose記述子をYAMLとして書き出す
pub fn write_compose_file(path: &Path, compose: &ComposeFile) -> Result<()> {
    let yaml = serde_yaml::to_string(compose)?;

    std::fs::write(path, yaml).map_err(|e| StackError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(
        path = %path.display(),
        services = compose.services.len(),
        networks = compose.networks.len(),
        "Wrote compose file"
    );
    Ok(())
}
