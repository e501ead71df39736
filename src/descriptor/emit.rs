use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::descriptor::model::ResolvedBuild;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmitFormat {
    /// Java properties, readable from a Gradle script.
    #[default]
    Properties,
    Json,
    /// `KEY='value'` shell assignments.
    Env,
}

/// Flattened key/value view in a stable order.
pub fn property_pairs(build: &ResolvedBuild) -> Vec<(String, String)> {
    let d = &build.descriptor;
    let level = build.toolchain.language_level.to_string();
    let mut pairs = vec![
        ("applicationId".to_string(), d.application_id.clone()),
        ("minSdkVersion".to_string(), d.min_platform_version.to_string()),
        ("targetSdkVersion".to_string(), d.target_platform_version.to_string()),
        ("compileSdkVersion".to_string(), d.compile_platform_version.to_string()),
        ("versionName".to_string(), d.version_name.clone()),
        ("versionCode".to_string(), d.version_code.to_string()),
    ];
    if let Some(ndk) = &build.ndk_version {
        pairs.push(("ndkVersion".to_string(), ndk.clone()));
    }
    for (key, value) in build.manifest_placeholders.iter() {
        pairs.push((format!("manifestPlaceholders.{key}"), value.to_string()));
    }
    pairs.push(("toolchain.sourceCompatibility".to_string(), level.clone()));
    pairs.push(("toolchain.targetCompatibility".to_string(), level.clone()));
    pairs.push(("toolchain.jvmTarget".to_string(), level));
    pairs.push((
        "release.signingConfig".to_string(),
        build.release.signing_config.clone(),
    ));
    pairs.push((
        "release.minifyEnabled".to_string(),
        build.release.minify_enabled().to_string(),
    ));
    if let Some(rules) = &build.release.shrink_rules {
        pairs.push(("release.proguardFiles".to_string(), rules.join(",")));
    }
    pairs
}

fn escape_property(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for (idx, c) in raw.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

/// `manifestPlaceholders.APP_VERSION` -> `BUILD_MANIFEST_PLACEHOLDERS_APP_VERSION`.
fn env_key(key: &str) -> String {
    let mut out = String::from("BUILD_");
    let mut prev_lower = false;
    for c in key.chars() {
        if c == '.' {
            out.push('_');
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_uppercase());
    }
    out
}

fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

pub fn render(build: &ResolvedBuild, format: EmitFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        EmitFormat::Properties => {
            for (key, value) in property_pairs(build) {
                writeln!(
                    out,
                    "{}={}",
                    escape_property(&key, true),
                    escape_property(&value, false)
                )?;
            }
        }
        EmitFormat::Json => {
            out = serde_json::to_string_pretty(build)?;
            out.push('\n');
        }
        EmitFormat::Env => {
            for (key, value) in property_pairs(build) {
                writeln!(out, "{}={}", env_key(&key), shell_quote(&value))?;
            }
        }
    }
    Ok(out)
}

pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| {
        anyhow::anyhow!("failed persisting {} atomically: {}", path.display(), e.error)
    })?;
    Ok(())
}
