//! シークレットストア
//!
//! `{{GENERATE_N}}` 形式のプレースホルダを、N文字のhexシークレットに解決します。
//! 一度生成した値は永続化され、同じ変数名に対しては実行をまたいでも
//! 同一の値が返ります（冪等生成）。
//!
//! ## セキュリティ
//!
//! - 生成にはOSの暗号乱数源のみを使用し、失敗時のフォールバックはありません
//! - 解決された値はログに出力されません

use crate::error::{Result, StackError};
use rand::RngCore;
use rand::rngs::OsRng;
use std::collections::BTreeMap;
use tracing::debug;

/// プレースホルダのプレフィックス
const GENERATE_PREFIX: &str = "{{GENERATE_";
/// プレースホルダのサフィックス
const GENERATE_SUFFIX: &str = "}}";

/// 値がプレースホルダ形式かどうかをチェック
///
/// 文字数部分が整数としてパースできない場合も「プレースホルダ形式」と
/// 判定されます（呼び出し側で警告を出すため）。
pub fn looks_like_placeholder(value: &str) -> bool {
    value.starts_with(GENERATE_PREFIX) && value.ends_with(GENERATE_SUFFIX)
}

/// シークレット生成指示
///
/// "hex出力でN文字のランダムシークレットを生成せよ" を表します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretPlaceholder {
    /// 要求される出力文字数（0以下は空文字列を意味する）
    pub length: i64,
}

impl SecretPlaceholder {
    /// `{{GENERATE_N}}` 形式の文字列からパース
    ///
    /// 形式に合わない、または N が整数でない場合は `None` を返します。
    pub fn parse(value: &str) -> Option<Self> {
        let inner = value
            .strip_prefix(GENERATE_PREFIX)?
            .strip_suffix(GENERATE_SUFFIX)?;
        let length = inner.parse::<i64>().ok()?;
        Some(Self { length })
    }
}

/// 生成済みシークレットの保管庫
///
/// 前回実行の `.env` から読み込んだ値を初期状態として持ち、
/// 新規生成分を追記していきます。グローバル状態ではなく、
/// リゾルバに明示的に注入して使います。
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    values: BTreeMap<String, String>,
}

impl SecretStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の値からストアを作成（前回実行の .env など）
    pub fn from_values(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// 変数名に対する値を解決する
    ///
    /// 既に値があればそれをそのまま返します（今回要求された長さは無視、
    /// 再生成も長さ検証も行いません）。なければ新規に生成して保管します。
    pub fn resolve(&mut self, name: &str, placeholder: SecretPlaceholder) -> Result<String> {
        if let Some(existing) = self.values.get(name) {
            return Ok(existing.clone());
        }

        let value = generate_hex_secret(placeholder.length)?;
        debug!(name = %name, length = placeholder.length, "Generated new secret");
        self.values.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// 変数名が既に値を持っているか
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// N文字のhexシークレットを生成
///
/// hexエンコードで長さが倍になるため、乱数バイトは ceil(N/2) だけ読み、
/// 出力をちょうどN文字に切り詰めます。N ≤ 0 は空文字列（エラーではない）。
fn generate_hex_secret(length: i64) -> Result<String> {
    if length <= 0 {
        return Ok(String::new());
    }

    let chars = length as usize;
    let mut bytes = vec![0u8; chars.div_ceil(2)];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StackError::RandomSource(e.to_string()))?;

    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(chars);
    Ok(hex)
}
