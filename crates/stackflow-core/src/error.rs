use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("サービスカタログを読み込めません: {path}\n理由: {message}")]
    MissingCatalog { path: PathBuf, message: String },

    #[error("有効化設定を読み込めません: {path}\n理由: {message}")]
    MissingEnablement { path: PathBuf, message: String },

    #[error("乱数源の読み取りに失敗しました: {0}")]
    RandomSource(String),

    #[error("依存 '{dependency}' (サービス '{service}') に image が指定されていません")]
    MissingDependencyImage { service: String, dependency: String },

    #[error("YAMLパースエラー: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO エラー: {path}\n理由: {message}")]
    IoError { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, StackError>;
