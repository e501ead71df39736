use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const VERSION_CODE_MODULUS: i64 = 2_000_000_000;
pub const DEFAULT_APPLICATION_ID: &str = "com.fede22dev.beauty_center";
pub const DEFAULT_MIN_SDK: i64 = 21;
pub const DEFAULT_TARGET_SDK: i64 = 34;
pub const DEFAULT_COMPILE_SDK: i64 = 34;
pub const DEFAULT_SIGNING_CONFIG: &str = "debug";
pub const DEFAULT_SHRINK_RULES: [&str; 2] =
    ["proguard-android-optimize.txt", "proguard-rules.pro"];

pub const PLACEHOLDER_APP_VERSION: &str = "APP_VERSION";
pub const PLACEHOLDER_BUILD_NUMBER: &str = "BUILD_NUMBER";

/// Build parameters computed once per build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    pub application_id: String,
    pub min_platform_version: u32,
    pub target_platform_version: u32,
    pub compile_platform_version: u32,
    pub version_name: String,
    pub version_code: u32,
}

/// Named substitution values injected into the application manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ManifestPlaceholders(BTreeMap<String, String>);

impl ManifestPlaceholders {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Java source/target compatibility level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LanguageLevel {
    Java11,
    Java17,
}

impl LanguageLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Java11 => 11,
            Self::Java17 => 17,
        }
    }
}

impl TryFrom<u8> for LanguageLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            11 => Ok(Self::Java11),
            17 => Ok(Self::Java17),
            other => Err(format!("unsupported language level {other}: use 11 or 17")),
        }
    }
}

impl From<LanguageLevel> for u8 {
    fn from(level: LanguageLevel) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl FromStr for LanguageLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().trim_start_matches("VERSION_").trim_start_matches("1.");
        let parsed = raw
            .parse::<u8>()
            .map_err(|_| format!("invalid language level `{s}`: use 11 or 17"))?;
        Self::try_from(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainConfig {
    pub language_level: LanguageLevel,
}

/// Which of the two build script flavours is being reproduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    /// Java 11 toolchain, no code shrinking on release.
    #[default]
    Standard,
    /// Java 17 toolchain, code shrinking with proguard rule files on release.
    Hardened,
}

impl BuildVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hardened => "hardened",
        }
    }

    pub fn toolchain(self) -> ToolchainConfig {
        let language_level = match self {
            Self::Standard => LanguageLevel::Java11,
            Self::Hardened => LanguageLevel::Java17,
        };
        ToolchainConfig { language_level }
    }

    pub fn default_shrink_rules(self) -> Option<Vec<String>> {
        match self {
            Self::Standard => None,
            Self::Hardened => Some(DEFAULT_SHRINK_RULES.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "hardened" => Ok(Self::Hardened),
            other => Err(format!("invalid variant `{other}`: use `standard` or `hardened`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseConfig {
    pub signing_config: String,
    pub shrink_rules: Option<Vec<String>>,
}

impl ReleaseConfig {
    pub fn minify_enabled(&self) -> bool {
        self.shrink_rules.is_some()
    }
}

/// Everything one invocation hands to the packaging step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBuild {
    pub built_at_epoch_secs: i64,
    pub variant: BuildVariant,
    pub descriptor: BuildDescriptor,
    pub manifest_placeholders: ManifestPlaceholders,
    pub toolchain: ToolchainConfig,
    pub release: ReleaseConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
}
