use anyhow::Result;

use crate::commands::{CommandReport, InputOverrides, load_and_resolve};
use crate::util::format_epoch_rfc3339;

pub fn run(overrides: &InputOverrides) -> Result<CommandReport> {
    let resolved = load_and_resolve(overrides)?;
    let build = &resolved.build;
    let d = &build.descriptor;
    let mut report = CommandReport::new("resolve");

    report.detail(format!("application_id={}", d.application_id));
    report.detail(format!("variant={}", build.variant));
    report.detail(format!("version_name={}", d.version_name));
    report.detail(format!("version_code={}", d.version_code));
    report.detail(format!("min_sdk={}", d.min_platform_version));
    report.detail(format!("target_sdk={}", d.target_platform_version));
    report.detail(format!("compile_sdk={}", d.compile_platform_version));
    if let Some(ndk) = &build.ndk_version {
        report.detail(format!("ndk_version={ndk}"));
    }
    report.detail(format!(
        "toolchain.language_level={}",
        build.toolchain.language_level
    ));
    report.detail(format!(
        "release.signing_config={}",
        build.release.signing_config
    ));
    report.detail(format!(
        "release.minify_enabled={}",
        build.release.minify_enabled()
    ));
    if let Some(rules) = &build.release.shrink_rules {
        report.detail(format!("release.shrink_rules={}", rules.join(",")));
    }
    if let Some(path) = resolved
        .loaded
        .config_path
        .as_ref()
        .filter(|_| resolved.loaded.config_file_loaded)
    {
        report.detail(format!("config={}", path.display()));
    }
    report.detail(format!(
        "built_at={} ({})",
        format_epoch_rfc3339(build.built_at_epoch_secs),
        resolved.clock.as_str()
    ));

    Ok(report)
}
