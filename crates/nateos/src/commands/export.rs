//! `export` handler: the device's running configuration.

use nateos_core::Console;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let document = console.running_config().await?;
    // The running config has no table layout of its own.
    let format = match global.output {
        OutputFormat::Table | OutputFormat::Plain => OutputFormat::Json,
        other => other,
    };
    let out = output::render_structured(format, &document)?.unwrap_or_default();
    output::print_output(&out, global.quiet);
    Ok(())
}
