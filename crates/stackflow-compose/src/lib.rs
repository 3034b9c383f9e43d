//! stackflow-compose
//!
//! 実効サービスセットと解決済み環境変数から、
//! コンテナオーケストレーション記述子（compose形式）を合成します。

pub mod model;
pub mod synthesizer;
pub mod writer;

pub use model::{ComposeFile, ComposeService, NetworkSpec, RestartPolicy};
pub use synthesizer::synthesize;
pub use writer::{write_compose_file, write_env_file};
