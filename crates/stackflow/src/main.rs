//! stackflow CLI
//!
//! サービスカタログ・ポートオーバーライド・有効化設定の３層から
//! `.env` と compose 記述子を生成するワンショットコマンド。

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use stackflow_compose::{synthesize, write_compose_file, write_env_file};
use stackflow_core::{SecretStore, loader, merge_effective, resolve_environment};

/// カタログから compose 記述子と .env を生成する
#[derive(Parser, Debug)]
#[command(name = "stackflow", version, about)]
struct Cli {
    /// 設定ディレクトリ（services.yaml / ports.yaml を含む）
    #[arg(short = 'c', long, default_value = "config")]
    config_dir: PathBuf,

    /// 有効化設定ファイル（INI形式）
    #[arg(long, default_value = "plugins.conf")]
    plugins: PathBuf,

    /// 環境変数ファイル（前回値の読み込みと今回値の書き出しに使う）
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// 出力する compose ファイル
    #[arg(short = 'o', long, default_value = "docker-compose.yml")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // 入力３層 + 前回の .env を読み込む
    let catalog = loader::load_catalog(&cli.config_dir.join("services.yaml"))?;
    let overrides = loader::load_port_overrides(&cli.config_dir.join("ports.yaml"))?;
    let enabled = loader::load_enablement(&cli.plugins)?;
    let persisted = loader::load_env_file(&cli.env_file)?;

    // マージ → 環境変数解決 → 記述子合成
    let effective = merge_effective(&catalog, &overrides, &enabled);
    debug!(services = effective.len(), "Merged effective service set");

    let mut store = SecretStore::from_values(persisted);
    let flat = resolve_environment(&effective, &mut store)?;
    let compose = synthesize(&effective, &flat)?;

    // 全工程の成功後にのみ書き出す（失敗時は前回の出力を保持）
    write_env_file(&cli.env_file, &flat)?;
    write_compose_file(&cli.output, &compose)?;

    println!("{}", "✅ 設定を生成しました！".green());
    println!(
        "  サービス: {}個（うち依存 {}個） / ネットワーク: {}個",
        compose.services.len().to_string().cyan(),
        (compose.services.len() - effective.len())
            .to_string()
            .cyan(),
        compose.networks.len().to_string().cyan()
    );
    println!("  {} / {}", cli.env_file.display(), cli.output.display());

    Ok(())
}
