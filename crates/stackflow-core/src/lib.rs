//! stackflow-core
//!
//! サービスカタログと環境別オーバーライドから実効サービスセットを組み立て、
//! 環境変数（シークレット含む）を解決するコア機能を提供します。

pub mod env;
pub mod error;
pub mod loader;
pub mod merge;
pub mod model;
pub mod secrets;

pub use env::resolve_environment;
pub use error::{Result, StackError};
pub use merge::merge_effective;
pub use model::*;
pub use secrets::{SecretPlaceholder, SecretStore};
