//! `status` handler: liveness probe.

use serde::Serialize;

use nateos_core::Console;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StatusReport {
    api_url: String,
    status: String,
    reachable: bool,
}

pub async fn handle(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let reachability = console.connectivity().probe().await;
    let report = StatusReport {
        api_url: console.config().api_url.to_string(),
        status: reachability.to_string(),
        reachable: reachability.is_reachable(),
    };

    let out = match output::render_structured(global.output, &report)? {
        Some(text) => text,
        None => format!("{}  {}", report.status, report.api_url),
    };
    output::print_output(&out, global.quiet);

    if report.reachable {
        Ok(())
    } else {
        Err(CliError::Unreachable {
            url: report.api_url,
        })
    }
}
