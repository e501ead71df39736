//! Reader for the `local.properties` file the Flutter tool writes next to
//! the Android project.

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const KEY_VERSION_NAME: &str = "flutter.versionName";
pub const KEY_MIN_SDK: &str = "flutter.minSdkVersion";
pub const KEY_TARGET_SDK: &str = "flutter.targetSdkVersion";
pub const KEY_COMPILE_SDK: &str = "flutter.compileSdkVersion";
pub const KEY_NDK_VERSION: &str = "flutter.ndkVersion";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProperties {
    entries: BTreeMap<String, String>,
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Byte index of the first unescaped `=` or `:`.
fn separator_index(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return Some(idx),
            _ => {}
        }
    }
    None
}

impl LocalProperties {
    pub fn parse(raw: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = match separator_index(line) {
                Some(idx) => (&line[..idx], &line[idx + 1..]),
                None => (line, ""),
            };
            entries.insert(unescape(key.trim()), unescape(value.trim()));
        }
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            ConfigError::LocalProperties(format!("failed to read {}: {err}", path.display()))
        })?;
        Ok(Self::parse(&raw))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.parse::<i64>().map(Some).map_err(|_| {
            ConfigError::LocalProperties(format!("{key}={raw} is not an integer"))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
