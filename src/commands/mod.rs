pub mod emit;
pub mod placeholders;
pub mod resolve;
pub mod show_config;

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::descriptor::config::{DescriptorConfig, LoadOptions, LoadedConfig, load_config};
use crate::descriptor::model::{BuildVariant, ResolvedBuild};
use crate::descriptor::resolve_build;
use crate::util::{ClockSource, SOURCE_DATE_EPOCH_ENV, build_epoch_secs};

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

/// Values given on the command line; they sit on top of every other layer.
#[derive(Debug, Clone, Default)]
pub struct InputOverrides {
    pub config_path: Option<PathBuf>,
    pub local_properties: Option<PathBuf>,
    pub now: Option<i64>,
    pub application_id: Option<String>,
    pub version_name: Option<String>,
    pub min_sdk: Option<i64>,
    pub target_sdk: Option<i64>,
    pub compile_sdk: Option<i64>,
    pub variant: Option<BuildVariant>,
}

impl InputOverrides {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config_path.clone(),
            local_properties: self.local_properties.clone(),
        }
    }

    fn apply(&self, cfg: &mut DescriptorConfig) {
        if let Some(application_id) = &self.application_id {
            cfg.application.application_id = application_id.clone();
        }
        // Kept verbatim, even when blank, so the resolver can reject it.
        if let Some(version_name) = &self.version_name {
            cfg.version.version_name = Some(version_name.clone());
        }
        if let Some(min_sdk) = self.min_sdk {
            cfg.sdk.min_sdk = min_sdk;
        }
        if let Some(target_sdk) = self.target_sdk {
            cfg.sdk.target_sdk = target_sdk;
        }
        if let Some(compile_sdk) = self.compile_sdk {
            cfg.sdk.compile_sdk = compile_sdk;
        }
        if let Some(variant) = self.variant {
            cfg.variant = variant;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedInvocation {
    pub loaded: LoadedConfig,
    pub build: ResolvedBuild,
    pub clock: ClockSource,
}

pub fn load_and_resolve(overrides: &InputOverrides) -> Result<ResolvedInvocation> {
    let mut loaded = load_config(&overrides.load_options())?;
    overrides.apply(&mut loaded.config);

    let source_date_epoch = std::env::var(SOURCE_DATE_EPOCH_ENV).ok();
    let (now, clock) = build_epoch_secs(overrides.now, source_date_epoch.as_deref())?;
    tracing::debug!(now, clock = clock.as_str(), "build timestamp selected");

    let build = resolve_build(&loaded.config, now).inspect_err(|err| {
        tracing::debug!(code = err.code().as_str(), "descriptor resolution failed");
    })?;
    Ok(ResolvedInvocation {
        loaded,
        build,
        clock,
    })
}
