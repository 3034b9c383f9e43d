//! トポロジー合成
//!
//! 実効サービスセットと解決済み環境変数から compose 記述子を組み立てます。
//! 依存を持つサービスごとに専用の内部ネットワークを作り、依存コンテナは
//! そのネットワークにのみ所属させます（デフォルトネットワークには置かない）。

use crate::model::{ComposeFile, ComposeService, DEFAULT_NETWORK, NetworkSpec, RestartPolicy};
use stackflow_core::env::FlatEnv;
use stackflow_core::error::{Result, StackError};
use stackflow_core::model::EffectiveServiceSet;
use std::collections::BTreeMap;
use tracing::debug;

/// サービス専用内部ネットワークの名前を生成
pub fn internal_network_name(service: &str) -> String {
    format!("{}_internal", service)
}

/// 依存から合成される隠しサービスの名前を生成
pub fn dependency_service_name(service: &str, dep_key: &str) -> String {
    format!("{}_{}", service, dep_key)
}

/// compose記述子を合成する
///
/// サービスごとに:
/// 1. `image:version` を組み立て、デフォルトネットワークに所属させる
/// 2. 依存が１つ以上あれば `<service>_internal` ネットワーク（internal=true）を
///    作成し、所属に加える
/// 3. 依存 `dep_key` ごとに隠しサービス `<service>_<dep_key>` を実体化し、
///    `<DEP_KEY>_HOST` / `<DEP_KEY>_PORT` を所有サービスの環境に注入する
/// 4. 所有サービスの環境は、宣言されたキー名で `flat` を絞り込んだ部分集合
///    （注入された HOST/PORT と衝突した場合は宣言値が勝つ）
///
/// image 未指定の依存は `MissingDependencyImage` エラーになります。
pub fn synthesize(effective: &EffectiveServiceSet, flat: &FlatEnv) -> Result<ComposeFile> {
    let mut file = ComposeFile::default();
    file.networks
        .insert(DEFAULT_NETWORK.to_string(), NetworkSpec::default());

    for (name, spec) in effective {
        let mut entry = ComposeService {
            image: format!("{}:{}", spec.image, spec.version),
            ports: spec.ports.clone(),
            networks: vec![DEFAULT_NETWORK.to_string()],
            restart: Some(RestartPolicy::Always),
            command: spec.command.clone(),
            ..Default::default()
        };

        if !spec.dependencies.is_empty() {
            let network = internal_network_name(name);
            debug!(service = %name, network = %network, "Creating internal network");
            file.networks
                .insert(network.clone(), NetworkSpec { internal: true });
            entry.networks.push(network.clone());

            for (dep_key, dep) in &spec.dependencies {
                let dep_name = dependency_service_name(name, dep_key);
                entry.depends_on.push(dep_name.clone());

                let key_upper = dep_key.to_uppercase();
                entry
                    .environment
                    .insert(format!("{}_HOST", key_upper), dep_name.clone());
                entry
                    .environment
                    .insert(format!("{}_PORT", key_upper), dep.expose.to_string());

                let image =
                    dep.image
                        .as_deref()
                        .ok_or_else(|| StackError::MissingDependencyImage {
                            service: name.clone(),
                            dependency: dep_key.clone(),
                        })?;

                // 依存コンテナの環境は、宣言キー名で flat を絞り込んだ部分集合
                let dep_env: BTreeMap<String, String> = dep
                    .environment
                    .keys()
                    .map(|k| (k.clone(), flat.get(k).cloned().unwrap_or_default()))
                    .collect();

                file.services.insert(
                    dep_name,
                    ComposeService {
                        image: format!("{}:{}", image, dep.version),
                        expose: vec![dep.expose.to_string()],
                        environment: dep_env,
                        // 所有サービスの内部ネットワークのみ。
                        // デフォルトネットワークには置かない（分離保証）
                        networks: vec![network.clone()],
                        restart: Some(RestartPolicy::Always),
                        ..Default::default()
                    },
                );
            }
        }

        // 自身の宣言キーを flat から埋める（注入済み HOST/PORT を上書きし得る）
        for key in spec.environment.keys() {
            entry
                .environment
                .insert(key.clone(), flat.get(key).cloned().unwrap_or_default());
        }

        file.services.insert(name.clone(), entry);
    }

    Ok(file)
}
