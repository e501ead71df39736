use anyhow::Result;
use std::path::PathBuf;

use crate::commands::{CommandReport, InputOverrides, load_and_resolve};
use crate::descriptor::emit::{EmitFormat, render, write_atomic};

#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub format: EmitFormat,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum EmitOutcome {
    /// Rendered text for stdout.
    Stdout(String),
    Written(CommandReport),
}

pub fn run(overrides: &InputOverrides, opts: &EmitOptions) -> Result<EmitOutcome> {
    let resolved = load_and_resolve(overrides)?;
    let rendered = render(&resolved.build, opts.format)?;

    let Some(out) = &opts.out else {
        return Ok(EmitOutcome::Stdout(rendered));
    };

    write_atomic(out, &rendered)?;
    tracing::info!(path = %out.display(), "wrote build descriptor");

    let mut report = CommandReport::new("emit");
    report.detail(format!("written={}", out.display()));
    report.detail(format!("format={:?}", opts.format).to_lowercase());
    report.detail(format!(
        "version_code={}",
        resolved.build.descriptor.version_code
    ));
    Ok(EmitOutcome::Written(report))
}
