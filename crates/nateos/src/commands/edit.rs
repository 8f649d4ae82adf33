//! `set`, `add` and `delete` handlers.
//!
//! Every write goes through a modal form session so command-line
//! assignments, interactive prompts and the dashboard share one set of
//! coercion rules.

use dialoguer::{Input, Select};

use nateos_core::model::UpsertRoute;
use nateos_core::{
    Console, DomainId, FieldKind, FormField, FormSpec, ModalController, MutationKind,
    MutationResult, Shape, describe,
};

use crate::cli::{AddArgs, DeleteArgs, GlobalOpts, SetArgs};
use crate::error::CliError;

use super::util;

// ── set ─────────────────────────────────────────────────────────────

pub async fn set(console: &Console, args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let domain = util::parse_domain(&args.domain)?;
    let descriptor = describe(domain);
    let (key, assignments) = split_key(&args.args)?;

    // Current values pre-fill the form.
    console.reload(domain).await?;
    let state = console.view(domain).state_or_default();

    let mut form = FormSpec::for_domain(domain, MutationKind::Upsert)?;
    let mut captures = Vec::new();

    match (descriptor.upsert, key) {
        (Some(UpsertRoute::Member), Some(key)) => {
            if let Some(record) = state.get(key) {
                form = form.with_values(record);
            }
            form = form.with_key(key);
        }
        (Some(UpsertRoute::Create), Some(key)) => {
            if let Some(record) = state.get(key) {
                form = form.with_values(record);
            }
            if let Some(spec) = descriptor.key.filter(|k| k.in_payload) {
                captures.push((spec.name, key));
            }
        }
        (Some(UpsertRoute::Resource), None) => {
            if let Some(record) = state.single() {
                form = form.with_values(record);
            }
        }
        (Some(UpsertRoute::Resource), Some(extra)) => {
            return Err(CliError::Validation {
                field: extra.into(),
                reason: format!("{domain} has no entries; expected FIELD=VALUE"),
            });
        }
        (Some(UpsertRoute::Member | UpsertRoute::Create), None) => {}
        (None, _) => {
            return Err(CliError::Unsupported(format!(
                "{domain} entries cannot be edited in place; use `nateos add {domain}`"
            )));
        }
    }

    let result = run_form(console, form, &captures, &assignments, args.form.interactive).await;
    util::report_outcome(console, global);
    result
}

// ── add ─────────────────────────────────────────────────────────────

pub async fn add(console: &Console, args: AddArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let domain = util::parse_domain(&args.domain)?;
    let kind = add_kind(domain)?;
    let form = FormSpec::for_domain(domain, kind)?;
    let assignments: Vec<&str> = args.assignments.iter().map(String::as_str).collect();

    let result = run_form(console, form, &[], &assignments, args.form.interactive).await;
    util::report_outcome(console, global);
    result
}

fn add_kind(domain: DomainId) -> Result<MutationKind, CliError> {
    let descriptor = describe(domain);
    match (descriptor.shape, descriptor.upsert) {
        (Shape::OrderedList, _) => Ok(MutationKind::Append),
        (_, Some(UpsertRoute::Create)) => Ok(MutationKind::Upsert),
        _ => Err(CliError::Unsupported(format!(
            "{domain} has no entries to add; use `nateos set {domain}`"
        ))),
    }
}

// ── delete ──────────────────────────────────────────────────────────

pub async fn delete(
    console: &Console,
    args: DeleteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let domain = util::parse_domain(&args.domain)?;
    let pending = console.request_delete(domain, args.key)?;

    if !util::confirm(pending.prompt(), global.yes)? {
        pending.cancel();
        if !global.quiet {
            eprintln!("Cancelled");
        }
        return Ok(());
    }

    let result = pending.confirm().await;
    util::report_outcome(console, global);
    Ok(result?)
}

// ── Form plumbing ───────────────────────────────────────────────────

/// First positional without `=` is the entry key; the rest are assignments.
fn split_key(args: &[String]) -> Result<(Option<&str>, Vec<&str>), CliError> {
    let mut key = None;
    let mut assignments = Vec::new();
    for arg in args {
        if arg.contains('=') {
            assignments.push(arg.as_str());
        } else if key.is_none() {
            key = Some(arg.as_str());
        } else {
            return Err(CliError::Validation {
                field: arg.clone(),
                reason: "only one entry key may be given; expected FIELD=VALUE".into(),
            });
        }
    }
    Ok((key, assignments))
}

async fn run_form(
    console: &Console,
    form: FormSpec,
    captures: &[(&str, &str)],
    assignments: &[&str],
    interactive: bool,
) -> Result<(), CliError> {
    let dispatch = {
        let mut modal = console.modal().await;
        modal.open(form);

        for (field, value) in captures {
            modal.capture(field, *value)?;
        }
        for arg in assignments {
            let (field, value) = util::parse_assignment(arg)?;
            modal.capture(field, value)?;
        }
        if interactive {
            prompt_fields(&mut modal)?;
        }
        modal.submit()
    };

    let result: MutationResult = match dispatch {
        Ok(handle) => handle
            .await
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
        Err(e) => Err(e),
    };
    Ok(result?)
}

/// Ask for every field of the open form, starting from what it holds.
fn prompt_fields(modal: &mut ModalController) -> Result<(), CliError> {
    let Some(session) = modal.session() else {
        return Ok(());
    };
    eprintln!("{}", session.form().title);
    let fields = session.form().fields.clone();

    for field in fields {
        let current = modal
            .session()
            .and_then(|s| s.value(field.spec.name))
            .unwrap_or_default()
            .to_owned();
        let text = prompt_field(&field, &current)?;
        modal.capture(field.spec.name, text)?;
    }
    Ok(())
}

fn prompt_field(field: &FormField, current: &str) -> Result<String, CliError> {
    let options: &[&str] = match field.spec.kind {
        FieldKind::Choice(options) => options,
        FieldKind::Toggle => &["on", "off"],
        FieldKind::Text | FieldKind::Number => {
            return Input::<String>::new()
                .with_prompt(field.spec.label)
                .with_initial_text(current)
                .allow_empty(!field.spec.required)
                .interact_text()
                .map_err(util::prompt_err);
        }
    };

    let default = options.iter().position(|o| *o == current).unwrap_or(0);
    let picked = Select::new()
        .with_prompt(field.spec.label)
        .items(options)
        .default(default)
        .interact()
        .map_err(util::prompt_err)?;
    Ok(options.get(picked).copied().unwrap_or_default().to_owned())
}
