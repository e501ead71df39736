use anyhow::Result;

use crate::commands::{CommandReport, InputOverrides};
use crate::descriptor::config::load_config;

pub fn run(overrides: &InputOverrides) -> Result<CommandReport> {
    let loaded = load_config(&overrides.load_options())?;
    let cfg = &loaded.config;
    let mut report = CommandReport::new("config");

    report.detail(
        "resolution.order=defaults -> descriptor.toml -> local.properties -> environment -> flags"
            .to_string(),
    );
    match &loaded.config_path {
        Some(path) if loaded.config_file_loaded => {
            report.detail(format!("resolution.descriptor_toml={}", path.display()));
        }
        Some(path) => {
            report.detail(format!(
                "resolution.descriptor_toml=missing ({})",
                path.display()
            ));
        }
        None => {
            report.detail("resolution.descriptor_toml=unresolved".to_string());
        }
    }
    match &loaded.local_properties_path {
        Some(path) => report.detail(format!("resolution.local_properties={}", path.display())),
        None => report.detail("resolution.local_properties=none".to_string()),
    }

    report.detail(format!(
        "application.application_id={}",
        cfg.application.application_id
    ));
    report.detail(format!("sdk.min_sdk={}", cfg.sdk.min_sdk));
    report.detail(format!("sdk.target_sdk={}", cfg.sdk.target_sdk));
    report.detail(format!("sdk.compile_sdk={}", cfg.sdk.compile_sdk));
    report.detail(format!("sdk.ndk_version={:?}", cfg.sdk.ndk_version));
    report.detail(format!("version.version_name={:?}", cfg.version.version_name));
    report.detail(format!("variant={}", cfg.variant));
    report.detail(format!(
        "toolchain.language_level={}",
        cfg.toolchain
            .language_level
            .unwrap_or(cfg.variant.toolchain().language_level)
    ));
    report.detail(format!(
        "release.signing_config={}",
        cfg.release.signing_config
    ));
    report.detail(format!("release.shrink_rules={:?}", cfg.release.shrink_rules));

    if cfg.version.version_name.is_none() {
        report.issue(
            "versionName is not set; provide --version-name, BUILD_VERSION_NAME, \
             local.properties or descriptor.toml",
        );
    }

    Ok(report)
}
