//! 環境変数解決
//!
//! 実効サービスセット全体の環境変数を１つのフラットな表に解決します。
//! プレースホルダ値はシークレットストア経由で解決され、
//! 同名変数の扱いは「後勝ち（last-write-wins）」で固定です。

use crate::error::Result;
use crate::model::EffectiveServiceSet;
use crate::secrets::{SecretPlaceholder, SecretStore, looks_like_placeholder};
use std::collections::BTreeMap;
use tracing::warn;

/// 解決済みのフラットな環境変数表（.env ファイルの内容そのもの）
pub type FlatEnv = BTreeMap<String, String>;

/// 実効サービスセット全体の環境変数を解決する
///
/// 各サービスについて自身の environment、続いて各依存の environment を
/// 名前順に走査します。プレースホルダはストアで解決（生成済みの値は
/// 再生成されない）、リテラルはそのまま採用。
///
/// 既知の制限: 異なるサービスが同名変数を異なるリテラル値で宣言した場合、
/// 走査順で後のものが前のものを上書きします（衝突検出なし）。
/// 走査順はソート済みなので結果は決定的です。
pub fn resolve_environment(
    effective: &EffectiveServiceSet,
    store: &mut SecretStore,
) -> Result<FlatEnv> {
    let mut flat = FlatEnv::new();

    for spec in effective.values() {
        resolve_map(&spec.environment, store, &mut flat)?;
        for dep in spec.dependencies.values() {
            resolve_map(&dep.environment, store, &mut flat)?;
        }
    }

    Ok(flat)
}

fn resolve_map(
    environment: &BTreeMap<String, String>,
    store: &mut SecretStore,
    flat: &mut FlatEnv,
) -> Result<()> {
    for (name, value) in environment {
        let resolved = match SecretPlaceholder::parse(value) {
            Some(placeholder) => store.resolve(name, placeholder)?,
            None => {
                if looks_like_placeholder(value) {
                    // 文字数部分が壊れているプレースホルダはリテラル扱いで通す
                    warn!(name = %name, value = %value, "Malformed secret placeholder, passing through as literal");
                }
                value.clone()
            }
        };
        flat.insert(name.clone(), resolved);
    }
    Ok(())
}
