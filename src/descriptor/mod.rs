pub mod config;
pub mod emit;
pub mod local_properties;
pub mod model;
pub mod resolver;

use crate::descriptor::config::DescriptorConfig;
use crate::descriptor::model::{ReleaseConfig, ResolvedBuild, ToolchainConfig};
use crate::descriptor::resolver::{Resolver, to_manifest_placeholders};
use crate::error::ConfigError;

/// Run the resolver over a fully layered config for one build.
pub fn resolve_build(
    cfg: &DescriptorConfig,
    now_epoch_secs: i64,
) -> Result<ResolvedBuild, ConfigError> {
    let resolver = Resolver::new(&cfg.application.application_id, cfg.sdk.compile_sdk)?;
    let descriptor = resolver.resolve(
        now_epoch_secs,
        cfg.version.version_name.as_deref(),
        cfg.sdk.min_sdk,
        cfg.sdk.target_sdk,
    )?;
    let manifest_placeholders = to_manifest_placeholders(&descriptor);

    let toolchain = match cfg.toolchain.language_level {
        Some(language_level) => ToolchainConfig { language_level },
        None => cfg.variant.toolchain(),
    };
    let shrink_rules = match &cfg.release.shrink_rules {
        Some(rules) if rules.is_empty() => None,
        Some(rules) => Some(rules.clone()),
        None => cfg.variant.default_shrink_rules(),
    };

    tracing::info!(
        application_id = %descriptor.application_id,
        version_name = %descriptor.version_name,
        version_code = descriptor.version_code,
        variant = %cfg.variant,
        "resolved build descriptor"
    );

    Ok(ResolvedBuild {
        built_at_epoch_secs: now_epoch_secs,
        variant: cfg.variant,
        descriptor,
        manifest_placeholders,
        toolchain,
        release: ReleaseConfig {
            signing_config: cfg.release.signing_config.trim().to_string(),
            shrink_rules,
        },
        ndk_version: cfg.sdk.ndk_version.clone(),
    })
}
