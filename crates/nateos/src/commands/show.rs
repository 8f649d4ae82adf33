//! `show` handler: load domains and render them.

use std::fmt::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use nateos_core::{
    Console, DomainDescriptor, DomainId, DomainState, Layer, LoadReport, Shape, describe,
};

use crate::cli::{GlobalOpts, OutputFormat, ShowArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// One domain as emitted by the structured formats.
#[derive(Serialize)]
struct DomainDump {
    domain: DomainId,
    title: &'static str,
    layer: Layer,
    shape: Shape,
    entries: DomainState,
}

pub async fn handle(
    console: &Console,
    args: ShowArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let requested = args
        .domains
        .iter()
        .map(|d| util::parse_domain(d))
        .collect::<Result<Vec<_>, _>>()?;

    let spinner = spinner(global, "Loading configuration...");
    let report = if requested.is_empty() {
        let started = console.start().await;
        tracing::debug!(reachability = %started.reachability, "startup probe");
        started.load
    } else {
        console.sync().load_many(&requested).await
    };
    spinner.finish_and_clear();

    let LoadReport { loaded: shown, failed } = report;
    if shown.is_empty() && !failed.is_empty() && failed.iter().all(|(_, f)| f.is_network()) {
        return Err(CliError::Unreachable {
            url: console.config().api_url.to_string(),
        });
    }
    for (domain, failure) in &failed {
        eprintln!("warning: could not load {domain}: {failure}");
    }

    let dumps: Vec<DomainDump> = shown
        .iter()
        .map(|&d| {
            let descriptor = describe(d);
            DomainDump {
                domain: d,
                title: descriptor.title,
                layer: descriptor.layer,
                shape: descriptor.shape,
                entries: console.view(d).state_or_default(),
            }
        })
        .collect();

    let out = match global.output {
        OutputFormat::Table => dumps
            .iter()
            .map(|dump| render_domain(describe(dump.domain), &dump.entries))
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Plain => dumps
            .iter()
            .map(|dump| render_plain(describe(dump.domain), &dump.entries))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        format => output::render_structured(format, &dumps)?.unwrap_or_default(),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

/// A spinner on stderr, hidden when quiet or not on a terminal.
pub fn spinner(global: &GlobalOpts, message: &'static str) -> ProgressBar {
    if global.quiet || global.output != OutputFormat::Table {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Table rendering ─────────────────────────────────────────────────

/// Title line plus a table, or the domain's placeholder when empty.
pub fn render_domain(descriptor: &DomainDescriptor, state: &DomainState) -> String {
    let mut out = format!("{} ({})\n", descriptor.title, descriptor.layer);

    match state {
        DomainState::Single(record) => {
            let mut rows: Vec<Vec<String>> = descriptor
                .fields
                .iter()
                .map(|f| vec![f.label.to_owned(), f.display(record.get(f.name))])
                .collect();
            rows.extend(
                record
                    .fields()
                    .filter(|(name, _)| descriptor.field(name).is_none())
                    .map(|(name, value)| vec![name.to_owned(), plain_value(value)]),
            );
            out.push_str(&output::render_table(&["Field", "Value"], rows));
        }
        _ if state.is_empty() => out.push_str(descriptor.empty_label),
        _ => {
            let key_label = descriptor.key.map_or("#", |k| k.label);
            let columns: Vec<_> = descriptor.column_fields().collect();
            let header: Vec<&str> = std::iter::once(key_label)
                .chain(columns.iter().map(|f| f.label))
                .collect();
            let rows = state
                .rows()
                .into_iter()
                .map(|(key, record)| {
                    std::iter::once(key)
                        .chain(columns.iter().map(|f| f.display(record.get(f.name))))
                        .collect()
                })
                .collect();
            out.push_str(&output::render_table(&header, rows));
        }
    }
    out
}

/// Keys one per line for collections, `field=value` lines for singletons.
fn render_plain(descriptor: &DomainDescriptor, state: &DomainState) -> String {
    match state {
        DomainState::Single(record) => {
            let mut out = String::new();
            for (name, value) in record.fields() {
                let _ = writeln!(out, "{}.{name}={}", descriptor.id, plain_value(value));
            }
            out.trim_end().to_owned()
        }
        _ => state
            .rows()
            .into_iter()
            .map(|(key, _)| format!("{}/{key}", descriptor.id))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn plain_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
