use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::descriptor::local_properties::{
    KEY_COMPILE_SDK, KEY_MIN_SDK, KEY_NDK_VERSION, KEY_TARGET_SDK, KEY_VERSION_NAME,
    LocalProperties,
};
use crate::descriptor::model::{
    BuildVariant, DEFAULT_APPLICATION_ID, DEFAULT_COMPILE_SDK, DEFAULT_MIN_SDK,
    DEFAULT_SIGNING_CONFIG, DEFAULT_TARGET_SDK, LanguageLevel,
};
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "descriptor.toml";
pub const CONFIG_PATH_ENV: &str = "BUILD_DESCRIPTOR_CONFIG";
pub const LOCAL_PROPERTIES_ENV: &str = "BUILD_LOCAL_PROPERTIES";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub application_id: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            application_id: DEFAULT_APPLICATION_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    pub min_sdk: i64,
    pub target_sdk: i64,
    pub compile_sdk: i64,
    pub ndk_version: Option<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            min_sdk: DEFAULT_MIN_SDK,
            target_sdk: DEFAULT_TARGET_SDK,
            compile_sdk: DEFAULT_COMPILE_SDK,
            ndk_version: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VersionConfig {
    pub version_name: Option<String>,
    pub local_properties: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolchainOverride {
    pub language_level: Option<LanguageLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseOverride {
    pub signing_config: String,
    /// `None` falls back to the variant default; an empty list disables shrinking.
    pub shrink_rules: Option<Vec<String>>,
}

impl Default for ReleaseOverride {
    fn default() -> Self {
        Self {
            signing_config: DEFAULT_SIGNING_CONFIG.to_string(),
            shrink_rules: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DescriptorConfig {
    pub application: ApplicationConfig,
    pub sdk: SdkConfig,
    pub version: VersionConfig,
    pub variant: BuildVariant,
    pub toolchain: ToolchainOverride,
    pub release: ReleaseOverride,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialDescriptorConfig {
    application: Option<PartialApplicationConfig>,
    sdk: Option<PartialSdkConfig>,
    version: Option<PartialVersionConfig>,
    variant: Option<BuildVariant>,
    toolchain: Option<ToolchainOverride>,
    release: Option<PartialReleaseConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialApplicationConfig {
    application_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialSdkConfig {
    min_sdk: Option<i64>,
    target_sdk: Option<i64>,
    compile_sdk: Option<i64>,
    ndk_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialVersionConfig {
    version_name: Option<String>,
    local_properties: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialReleaseConfig {
    signing_config: Option<String>,
    shrink_rules: Option<Vec<String>>,
}

/// Explicit paths from the command line; they win over env and file lookup.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub local_properties: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DescriptorConfig,
    pub config_path: Option<PathBuf>,
    pub config_file_loaded: bool,
    pub local_properties_path: Option<PathBuf>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_i64<F>(lookup: &F, var: &str, fallback: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_blank(lookup(var)) {
        Some(v) => v
            .parse::<i64>()
            .map_err(|_| ConfigError::invalid(var, format!("`{v}` is not an integer"))),
        None => Ok(fallback),
    }
}

fn env_or_string<F>(lookup: &F, var: &str, fallback: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup(var)).unwrap_or_else(|| fallback.to_string())
}

fn env_or_csv<F>(lookup: &F, var: &str, fallback: Option<Vec<String>>) -> Option<Vec<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return fallback;
    };
    let out = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();
    if out.is_empty() { fallback } else { Some(out) }
}

pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(custom) = non_blank(env::var(CONFIG_PATH_ENV).ok()) {
        return Some(PathBuf::from(custom));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("build-descriptor").join(CONFIG_FILE_NAME))
}

pub fn merge_file_config(base: &mut DescriptorConfig, raw: &str, path: &Path) -> Result<()> {
    let parsed: PartialDescriptorConfig = toml::from_str(raw)
        .map_err(|err| anyhow!("failed to parse descriptor config {}: {err}", path.display()))?;

    if let Some(application) = parsed.application
        && let Some(application_id) = application.application_id
    {
        base.application.application_id = application_id;
    }
    if let Some(sdk) = parsed.sdk {
        base.sdk.min_sdk = sdk.min_sdk.unwrap_or(base.sdk.min_sdk);
        base.sdk.target_sdk = sdk.target_sdk.unwrap_or(base.sdk.target_sdk);
        base.sdk.compile_sdk = sdk.compile_sdk.unwrap_or(base.sdk.compile_sdk);
        if sdk.ndk_version.is_some() {
            base.sdk.ndk_version = sdk.ndk_version;
        }
    }
    if let Some(version) = parsed.version {
        if version.version_name.is_some() {
            base.version.version_name = version.version_name;
        }
        if let Some(local_properties) = version.local_properties {
            // Relative paths are anchored at the config file.
            let anchored = match path.parent() {
                Some(dir) if local_properties.is_relative() => dir.join(local_properties),
                _ => local_properties,
            };
            base.version.local_properties = Some(anchored);
        }
    }
    if let Some(variant) = parsed.variant {
        base.variant = variant;
    }
    if let Some(toolchain) = parsed.toolchain {
        base.toolchain = toolchain;
    }
    if let Some(release) = parsed.release {
        if let Some(signing_config) = release.signing_config {
            base.release.signing_config = signing_config;
        }
        if release.shrink_rules.is_some() {
            base.release.shrink_rules = release.shrink_rules;
        }
    }
    Ok(())
}

pub fn merge_local_properties(
    base: &mut DescriptorConfig,
    props: &LocalProperties,
) -> Result<(), ConfigError> {
    if let Some(version_name) = props.get(KEY_VERSION_NAME) {
        base.version.version_name = Some(version_name.to_string());
    }
    if let Some(min_sdk) = props.get_i64(KEY_MIN_SDK)? {
        base.sdk.min_sdk = min_sdk;
    }
    if let Some(target_sdk) = props.get_i64(KEY_TARGET_SDK)? {
        base.sdk.target_sdk = target_sdk;
    }
    if let Some(compile_sdk) = props.get_i64(KEY_COMPILE_SDK)? {
        base.sdk.compile_sdk = compile_sdk;
    }
    if let Some(ndk_version) = props.get(KEY_NDK_VERSION) {
        base.sdk.ndk_version = Some(ndk_version.to_string());
    }
    Ok(())
}

pub fn apply_env_overrides<F>(base: &mut DescriptorConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    base.application.application_id = env_or_string(
        &lookup,
        "BUILD_APPLICATION_ID",
        &base.application.application_id,
    );
    if let Some(version_name) = non_blank(lookup("BUILD_VERSION_NAME")) {
        base.version.version_name = Some(version_name);
    }
    base.sdk.min_sdk = env_or_i64(&lookup, "BUILD_MIN_SDK", base.sdk.min_sdk)?;
    base.sdk.target_sdk = env_or_i64(&lookup, "BUILD_TARGET_SDK", base.sdk.target_sdk)?;
    base.sdk.compile_sdk = env_or_i64(&lookup, "BUILD_COMPILE_SDK", base.sdk.compile_sdk)?;
    if let Some(ndk_version) = non_blank(lookup("BUILD_NDK_VERSION")) {
        base.sdk.ndk_version = Some(ndk_version);
    }
    if let Some(raw) = non_blank(lookup("BUILD_VARIANT")) {
        base.variant = raw
            .parse::<BuildVariant>()
            .map_err(|msg| ConfigError::invalid("BUILD_VARIANT", msg))?;
    }
    if let Some(raw) = non_blank(lookup("BUILD_LANGUAGE_LEVEL")) {
        base.toolchain.language_level = Some(
            raw.parse::<LanguageLevel>()
                .map_err(|msg| ConfigError::invalid("BUILD_LANGUAGE_LEVEL", msg))?,
        );
    }
    base.release.signing_config = env_or_string(
        &lookup,
        "BUILD_SIGNING_CONFIG",
        &base.release.signing_config,
    );
    base.release.shrink_rules = env_or_csv(
        &lookup,
        "BUILD_SHRINK_RULES",
        base.release.shrink_rules.take(),
    );
    Ok(())
}

fn validate(cfg: &DescriptorConfig) -> Result<()> {
    if cfg.release.signing_config.trim().is_empty() {
        return Err(anyhow!(
            "invalid release config: signing_config cannot be empty"
        ));
    }
    if let Some(rules) = &cfg.release.shrink_rules
        && rules.iter().any(|r| r.trim().is_empty())
    {
        return Err(anyhow!(
            "invalid release config: shrink_rules cannot contain blank paths"
        ));
    }
    Ok(())
}

fn env_lookup(var: &str) -> Option<String> {
    env::var(var).ok()
}

pub fn load_config(opts: &LoadOptions) -> Result<LoadedConfig> {
    let mut cfg = DescriptorConfig::default();

    let config_path = resolve_config_path(opts.config_path.as_deref());
    let mut config_file_loaded = false;
    if let Some(path) = &config_path {
        if path.is_file() {
            let raw = fs::read_to_string(path)
                .map_err(|err| anyhow!("failed to read {}: {err}", path.display()))?;
            merge_file_config(&mut cfg, &raw, path)?;
            config_file_loaded = true;
            tracing::debug!(path = %path.display(), "merged descriptor config file");
        } else if opts.config_path.is_some() {
            return Err(anyhow!(
                "descriptor config {} does not exist",
                path.display()
            ));
        } else {
            tracing::debug!(path = %path.display(), "no descriptor config file");
        }
    }

    let local_properties_path = opts
        .local_properties
        .clone()
        .or_else(|| non_blank(env_lookup(LOCAL_PROPERTIES_ENV)).map(PathBuf::from))
        .or_else(|| cfg.version.local_properties.clone());
    if let Some(path) = &local_properties_path {
        let props = LocalProperties::load(path)?;
        merge_local_properties(&mut cfg, &props)?;
        cfg.version.local_properties = Some(path.clone());
        tracing::debug!(
            path = %path.display(),
            entries = props.len(),
            "merged local.properties"
        );
    }

    apply_env_overrides(&mut cfg, env_lookup)?;
    validate(&cfg)?;

    Ok(LoadedConfig {
        config: cfg,
        config_path,
        config_file_loaded,
        local_properties_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_project() {
        let cfg = DescriptorConfig::default();
        assert_eq!(cfg.application.application_id, "com.fede22dev.beauty_center");
        assert_eq!(cfg.sdk.min_sdk, 21);
        assert_eq!(cfg.sdk.target_sdk, 34);
        assert_eq!(cfg.sdk.compile_sdk, 34);
        assert_eq!(cfg.variant, BuildVariant::Standard);
        assert_eq!(cfg.release.signing_config, "debug");
        assert!(cfg.version.version_name.is_none());
    }

    #[test]
    fn file_config_overrides_only_named_fields() {
        let mut cfg = DescriptorConfig::default();
        merge_file_config(
            &mut cfg,
            r#"
variant = "hardened"

[sdk]
target_sdk = 35

[version]
version_name = "2.0.0"
local_properties = "android/local.properties"

[release]
shrink_rules = ["rules.pro"]
"#,
            Path::new("/project/descriptor.toml"),
        )
        .expect("merge");

        assert_eq!(cfg.variant, BuildVariant::Hardened);
        assert_eq!(cfg.sdk.min_sdk, 21);
        assert_eq!(cfg.sdk.target_sdk, 35);
        assert_eq!(cfg.version.version_name.as_deref(), Some("2.0.0"));
        assert_eq!(
            cfg.version.local_properties,
            Some(PathBuf::from("/project/android/local.properties"))
        );
        assert_eq!(cfg.release.shrink_rules, Some(vec!["rules.pro".to_string()]));
        assert_eq!(cfg.release.signing_config, "debug");
    }

    #[test]
    fn file_config_reads_language_level_number() {
        let mut cfg = DescriptorConfig::default();
        merge_file_config(
            &mut cfg,
            "[toolchain]\nlanguage_level = 17\n",
            Path::new("descriptor.toml"),
        )
        .expect("merge");
        assert_eq!(cfg.toolchain.language_level, Some(LanguageLevel::Java17));
    }

    #[test]
    fn unparsable_file_names_the_path() {
        let mut cfg = DescriptorConfig::default();
        let err = merge_file_config(&mut cfg, "[sdk\nmin_sdk = ", Path::new("/x/descriptor.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("/x/descriptor.toml"));
    }

    #[test]
    fn local_properties_override_file_values() {
        let mut cfg = DescriptorConfig::default();
        cfg.version.version_name = Some("0.0.1".to_string());
        let props = LocalProperties::parse(
            "flutter.versionName=1.4.0\n\
             flutter.minSdkVersion=23\n\
             flutter.ndkVersion=26.1.10909125\n",
        );
        merge_local_properties(&mut cfg, &props).expect("merge");
        assert_eq!(cfg.version.version_name.as_deref(), Some("1.4.0"));
        assert_eq!(cfg.sdk.min_sdk, 23);
        assert_eq!(cfg.sdk.target_sdk, 34);
        assert_eq!(cfg.sdk.ndk_version.as_deref(), Some("26.1.10909125"));
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let mut cfg = DescriptorConfig::default();
        cfg.version.version_name = Some("1.0.0".to_string());
        apply_env_overrides(
            &mut cfg,
            lookup_from(&[
                ("BUILD_VERSION_NAME", "9.9.9"),
                ("BUILD_MIN_SDK", " 26 "),
                ("BUILD_TARGET_SDK", ""),
                ("BUILD_VARIANT", "Hardened"),
                ("BUILD_APPLICATION_ID", "   "),
            ]),
        )
        .expect("env");
        assert_eq!(cfg.version.version_name.as_deref(), Some("9.9.9"));
        assert_eq!(cfg.sdk.min_sdk, 26);
        assert_eq!(cfg.sdk.target_sdk, 34);
        assert_eq!(cfg.variant, BuildVariant::Hardened);
        assert_eq!(cfg.application.application_id, "com.fede22dev.beauty_center");
    }

    #[test]
    fn env_negative_sdk_is_passed_through_for_the_resolver() {
        let mut cfg = DescriptorConfig::default();
        apply_env_overrides(&mut cfg, lookup_from(&[("BUILD_MIN_SDK", "-3")])).expect("env");
        assert_eq!(cfg.sdk.min_sdk, -3);
    }

    #[test]
    fn env_non_numeric_sdk_is_invalid_input() {
        let mut cfg = DescriptorConfig::default();
        let err = apply_env_overrides(&mut cfg, lookup_from(&[("BUILD_COMPILE_SDK", "latest")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput { .. }));
        assert!(err.to_string().contains("BUILD_COMPILE_SDK"));
    }

    #[test]
    fn env_shrink_rules_csv_and_blank_keeps_earlier_value() {
        let mut cfg = DescriptorConfig::default();
        apply_env_overrides(
            &mut cfg,
            lookup_from(&[("BUILD_SHRINK_RULES", "a.pro, b.pro,,")]),
        )
        .expect("env");
        assert_eq!(
            cfg.release.shrink_rules,
            Some(vec!["a.pro".to_string(), "b.pro".to_string()])
        );

        apply_env_overrides(&mut cfg, lookup_from(&[("BUILD_SHRINK_RULES", "")])).expect("env");
        assert_eq!(
            cfg.release.shrink_rules,
            Some(vec!["a.pro".to_string(), "b.pro".to_string()])
        );

        let mut cfg = DescriptorConfig::default();
        apply_env_overrides(&mut cfg, lookup_from(&[("BUILD_SHRINK_RULES", " ,, ")]))
            .expect("env");
        assert_eq!(cfg.release.shrink_rules, None);
    }

    #[test]
    fn env_language_level_pins_toolchain() {
        let mut cfg = DescriptorConfig::default();
        apply_env_overrides(
            &mut cfg,
            lookup_from(&[("BUILD_LANGUAGE_LEVEL", "VERSION_17")]),
        )
        .expect("env");
        assert_eq!(cfg.toolchain.language_level, Some(LanguageLevel::Java17));

        let err = apply_env_overrides(&mut cfg, lookup_from(&[("BUILD_LANGUAGE_LEVEL", "8")]))
            .unwrap_err();
        assert!(err.to_string().contains("BUILD_LANGUAGE_LEVEL"));
        assert_eq!(cfg.toolchain.language_level, Some(LanguageLevel::Java17));
    }

    #[test]
    fn blank_signing_config_fails_validation() {
        let mut cfg = DescriptorConfig::default();
        cfg.release.signing_config = " ".to_string();
        assert!(validate(&cfg).is_err());
    }
}
