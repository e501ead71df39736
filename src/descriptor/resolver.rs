use crate::descriptor::model::{
    BuildDescriptor, ManifestPlaceholders, PLACEHOLDER_APP_VERSION, PLACEHOLDER_BUILD_NUMBER,
    VERSION_CODE_MODULUS,
};
use crate::error::ConfigError;

/// Fixed per-project inputs; the per-build inputs go through [`Resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    application_id: String,
    compile_sdk: u32,
}

fn sdk_level(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeSdk { field, value });
    }
    u32::try_from(value)
        .map_err(|_| ConfigError::invalid(field, format!("{value} is out of range")))
}

/// Epoch seconds folded into the platform's accepted version code range.
pub fn version_code_for(epoch_secs: i64) -> Result<u32, ConfigError> {
    if epoch_secs < 0 {
        return Err(ConfigError::NegativeTimestamp(epoch_secs));
    }
    // Always < 2e9, so it fits in u32.
    Ok((epoch_secs % VERSION_CODE_MODULUS) as u32)
}

impl Resolver {
    pub fn new(application_id: &str, compile_sdk: i64) -> Result<Self, ConfigError> {
        let application_id = application_id.trim();
        if application_id.is_empty() {
            return Err(ConfigError::MissingInput("applicationId"));
        }
        Ok(Self {
            application_id: application_id.to_string(),
            compile_sdk: sdk_level("compileSdk", compile_sdk)?,
        })
    }

    pub fn resolve(
        &self,
        now_epoch_secs: i64,
        version_name: Option<&str>,
        min_sdk: i64,
        target_sdk: i64,
    ) -> Result<BuildDescriptor, ConfigError> {
        let version_name = version_name.ok_or(ConfigError::MissingInput("versionName"))?;
        let version_name = version_name.trim();
        if version_name.is_empty() {
            return Err(ConfigError::EmptyVersionName);
        }
        let min_platform_version = sdk_level("minSdk", min_sdk)?;
        let target_platform_version = sdk_level("targetSdk", target_sdk)?;
        let version_code = version_code_for(now_epoch_secs)?;

        if target_platform_version < min_platform_version {
            tracing::warn!(
                min_sdk = min_platform_version,
                target_sdk = target_platform_version,
                "targetSdk is lower than minSdk"
            );
        }
        if self.compile_sdk < target_platform_version {
            tracing::warn!(
                compile_sdk = self.compile_sdk,
                target_sdk = target_platform_version,
                "compileSdk is lower than targetSdk"
            );
        }

        Ok(BuildDescriptor {
            application_id: self.application_id.clone(),
            min_platform_version,
            target_platform_version,
            compile_platform_version: self.compile_sdk,
            version_name: version_name.to_string(),
            version_code,
        })
    }
}

pub fn to_manifest_placeholders(descriptor: &BuildDescriptor) -> ManifestPlaceholders {
    let mut placeholders = ManifestPlaceholders::default();
    placeholders.insert(PLACEHOLDER_APP_VERSION, descriptor.version_name.clone());
    placeholders.insert(
        PLACEHOLDER_BUILD_NUMBER,
        descriptor.version_code.to_string(),
    );
    placeholders
}
