//! サービス定義

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// カタログ内の１サービス定義
///
/// YAML形式：
/// ```yaml
/// api:
///   image: app
///   version: "1.0"
///   ports:
///     - "8080:80"
///   environment:
///     API_KEY: "{{GENERATE_32}}"
///   dependencies:
///     db:
///       image: postgres
///       version: "14"
///       expose: 5432
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// イメージ名（タグなし）
    pub image: String,
    /// イメージタグ
    pub version: String,
    /// "host:container" 形式のポート公開（順序保持）
    #[serde(default)]
    pub ports: Vec<String>,
    /// 環境変数（値はリテラルまたは {{GENERATE_N}} プレースホルダ）
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// 依存キー → 依存定義
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
    /// コンテナコマンドの上書き
    #[serde(default)]
    pub command: Option<String>,
}

/// サービスに付随する内部依存の定義
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencySpec {
    /// イメージ名。未指定の依存は合成時にエラーになる
    #[serde(default)]
    pub image: Option<String>,
    /// イメージタグ
    pub version: String,
    /// プライベートネットワークへの分離を期待するか
    /// （現状は常に内部扱いで配線され、このフラグで分岐はしない）
    #[serde(default)]
    pub internal: bool,
    /// コンテナ側の公開ポート
    #[serde(default)]
    pub expose: i64,
    /// 依存コンテナ自身の環境変数
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}
