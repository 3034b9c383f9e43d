//! compose記述子のモデル定義

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// デフォルトネットワーク名（全トップレベルサービスが所属する）
pub const DEFAULT_NETWORK: &str = "default";

/// compose記述子のルート
///
/// `services` と `networks` のみを持つ最小の compose ドキュメント。
/// マップは全て BTreeMap なので、シリアライズ結果はキー順で安定します。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub services: BTreeMap<String, ComposeService>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, NetworkSpec>,
}

/// 起動可能な１ユニット
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeService {
    /// "image:tag" 形式
    pub image: String,
    /// ホストに公開するポート（"host:container"）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    /// ネットワーク内にのみ公開するコンテナポート
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<RestartPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

/// ネットワーク定義
///
/// `internal: true` のネットワークは外部（デフォルトネットワーク含む）から
/// 到達できません。`internal: false` はフィールドごと省略されるので、
/// デフォルトネットワークは `default: {}` とシリアライズされます。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default, skip_serializing_if = "is_false")]
    pub internal: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// 再起動ポリシー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// 再起動しない
    No,
    /// 常に再起動（生成される全サービスのポリシー）
    #[default]
    Always,
    /// 異常終了時のみ再起動
    OnFailure,
    /// 明示的に停止しない限り再起動
    UnlessStopped,
}

impl RestartPolicy {
    /// Docker APIで使用する文字列に変換
    pub fn as_docker_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Always => "always",
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_policy_serializes_kebab_case() {
        assert_eq!(
            serde_yaml::to_string(&RestartPolicy::Always).unwrap().trim(),
            "always"
        );
        assert_eq!(
            serde_yaml::to_string(&RestartPolicy::OnFailure)
                .unwrap()
                .trim(),
            "on-failure"
        );
    }

    #[test]
    fn test_default_network_serializes_empty() {
        let mut networks = BTreeMap::new();
        networks.insert(DEFAULT_NETWORK.to_string(), NetworkSpec::default());
        networks.insert(
            "api_internal".to_string(),
            NetworkSpec { internal: true },
        );

        let yaml = serde_yaml::to_string(&networks).unwrap();
        // internal: false は省略される
        assert!(yaml.contains("default: {}"));
        assert!(yaml.contains("internal: true"));
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let file = ComposeFile {
            services: BTreeMap::from([(
                "api".to_string(),
                ComposeService {
                    image: "app:1.0".to_string(),
                    restart: Some(RestartPolicy::Always),
                    ..Default::default()
                },
            )]),
            ..Default::default()
        };

        let yaml = serde_yaml::to_string(&file).unwrap();
        assert!(yaml.contains("image: app:1.0"));
        assert!(yaml.contains("restart: always"));
        assert!(!yaml.contains("version"));
        assert!(!yaml.contains("ports"));
        assert!(!yaml.contains("depends_on"));
        assert!(!yaml.contains("command"));
    }
}
