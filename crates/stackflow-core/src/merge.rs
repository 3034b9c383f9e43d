//! 設定マージ
//!
//! カタログ・ポートオーバーライド・有効化セットの３層を
//! １つの実効サービスセットに統合します。

use crate::model::{Catalog, EffectiveServiceSet, PortOverrides};
use std::collections::BTreeMap;
use tracing::debug;

/// ３層の設定を実効サービスセットにマージする
///
/// - 有効化フラグが真のサービスのみ残す
/// - ポートオーバーライドがあるサービスは `ports` を丸ごと置き換える
///   （カタログ側とのマージはしない）
///
/// 出力のキー集合は常にカタログのキー集合の部分集合になります。
pub fn merge_effective(
    catalog: &Catalog,
    overrides: &PortOverrides,
    enabled: &BTreeMap<String, bool>,
) -> EffectiveServiceSet {
    let mut effective = EffectiveServiceSet::new();

    for (name, spec) in &catalog.services {
        if !enabled.get(name).copied().unwrap_or(false) {
            debug!(service = %name, "Skipping disabled service");
            continue;
        }

        let mut spec = spec.clone();
        if let Some(ports) = overrides.services.get(name) {
            debug!(service = %name, ports = ?ports, "Applying port override");
            spec.ports = ports.clone();
        }
        effective.insert(name.clone(), spec);
    }

    effective
}
