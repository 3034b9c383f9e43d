//! モデル定義
//!
//! カタログ・ポートオーバーライドの各ドキュメントと、
//! マージ後の実効サービスセットを定義します。

mod service;

// Re-exports
pub use service::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// カタログドキュメントのルート（services.yaml）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// サービス名 → 定義
    #[serde(default)]
    pub services: BTreeMap<String, ServiceSpec>,
}

/// ポートオーバーライドドキュメントのルート（ports.yaml）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortOverrides {
    /// サービス名 → "host:container" 列（カタログの ports を丸ごと置き換える）
    #[serde(default)]
    pub services: BTreeMap<String, Vec<String>>,
}

/// マージ後の実効サービスセット
///
/// 有効化フラグが真のサービスのみを含み、ポートオーバーライドは適用済み。
/// BTreeMap なのでイテレーション順はキー順で再現可能。
pub type EffectiveServiceSet = BTreeMap<String, ServiceSpec>;
