use anyhow::Result;

use crate::commands::{CommandReport, InputOverrides, load_and_resolve};
use crate::descriptor::model::{PLACEHOLDER_APP_VERSION, PLACEHOLDER_BUILD_NUMBER};

pub fn run(overrides: &InputOverrides) -> Result<CommandReport> {
    let resolved = load_and_resolve(overrides)?;
    let placeholders = &resolved.build.manifest_placeholders;
    let mut report = CommandReport::new("placeholders");

    for key in [PLACEHOLDER_APP_VERSION, PLACEHOLDER_BUILD_NUMBER] {
        match placeholders.get(key) {
            Some(value) => report.detail(format!("{key}={value}")),
            None => report.issue(format!("manifest placeholder {key} was not resolved")),
        }
    }

    Ok(report)
}
