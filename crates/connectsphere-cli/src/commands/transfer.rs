use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use connectsphere_core::normalize;
use connectsphere_store::error::StoreErrorKind;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file holding one raw record or an array of them; `-` reads stdin
    pub path: PathBuf,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Write to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
struct ImportReport {
    created: usize,
    updated: usize,
    skipped: usize,
    dry_run: bool,
}

pub fn import_contacts(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let raw = read_input(&args.path)?;
    let parsed: Value =
        serde_json::from_str(&raw).map_err(|err| invalid_input(format!("invalid JSON: {err}")))?;
    let records = match parsed {
        Value::Array(records) => records,
        record @ Value::Object(_) => vec![record],
        _ => return Err(invalid_input("expected a JSON object or array of objects")),
    };

    let mut report = ImportReport {
        dry_run: args.dry_run,
        ..ImportReport::default()
    };
    let repo = ctx.store.contacts();
    for record in &records {
        let contact = normalize(record);
        if let Err(err) = contact.validate() {
            warn!(id = %contact.id, error = %err, "skipping invalid record");
            report.skipped += 1;
            continue;
        }
        if args.dry_run {
            if repo.get(&contact.id)?.is_some() {
                report.updated += 1;
            } else {
                report.created += 1;
            }
            continue;
        }
        match repo.upsert(&contact) {
            Ok(true) => report.created += 1,
            Ok(false) => report.updated += 1,
            Err(err) if err.kind() == StoreErrorKind::RetiredId => {
                warn!(id = %contact.id, "skipping deleted contact id");
                report.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    debug!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        "import finished"
    );

    if ctx.json {
        print_json(&report)?;
    } else {
        let prefix = if args.dry_run { "dry run: " } else { "" };
        println!(
            "{}created {}, updated {}, skipped {}",
            prefix, report.created, report.updated, report.skipped
        );
    }
    Ok(())
}

/// Writes every contact in natural order as re-importable records.
pub fn export_contacts(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let contacts = ctx.store.contacts().list_all()?;
    let body = serde_json::to_string_pretty(&contacts)?;
    match args.out {
        Some(path) => {
            fs::write(&path, format!("{body}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            if ctx.json {
                print_json(&serde_json::json!({
                    "path": path.display().to_string(),
                    "count": contacts.len(),
                }))?;
            } else {
                println!("exported {} contacts to {}", contacts.len(), path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", body)?;
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
