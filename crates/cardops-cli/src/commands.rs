use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{debug, info, info_span, trace, warn};

use cardops_cli::logging::redact_value;
use cardops_cli::settings::{ENDPOINT_ENV, Settings};
use cardops_core::{HttpSubmitter, ImportSession, SessionError};
use cardops_report::{write_export, write_template};
use cardops_standards::ScreenRegistry;
use cardops_validate::CONTRACT_FIELD;

use crate::cli::{ImportArgs, TemplateArgs, ValidateRecordArgs};
use crate::summary::{apply_table_style, header_cell};
use crate::types::{
    ExportOutcome, FileOutcome, FileSummary, ImportResult, RecordResult, SubmissionOutcome,
};

fn load_registry() -> Result<ScreenRegistry> {
    ScreenRegistry::load_default().context("load screen catalogue")
}

pub fn run_screens() -> Result<()> {
    let registry = load_registry()?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Screen"),
        header_cell("Name"),
        header_cell("Operation"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    for screen in registry.screens() {
        table.add_row(vec![
            screen.id.clone(),
            screen.name.clone(),
            screen.operation.clone(),
            screen.expected_columns().join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_template(args: &TemplateArgs) -> Result<Vec<PathBuf>> {
    let registry = load_registry()?;
    let screens = match &args.screen {
        Some(id) => vec![registry.screen(id)?],
        None => registry.screens().iter().collect(),
    };
    screens
        .into_iter()
        .map(|screen| {
            write_template(&args.output_dir, screen)
                .with_context(|| format!("write template for {}", screen.id))
        })
        .collect()
}

pub fn run_import(args: &ImportArgs, settings: &Settings) -> Result<ImportResult> {
    let registry = load_registry()?;
    let mut session = ImportSession::open(&registry, &args.screen)?;
    session.set_company_field(CONTRACT_FIELD, args.contract.as_str());
    let company = match session.company_context() {
        Ok(company) => company,
        Err(issues) => {
            let details = issues
                .iter()
                .map(|issue| issue.message.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let err = SessionError::CompanyRequiredForUpload { issues };
            bail!("{} {details}", err.user_message());
        }
    };
    let span = info_span!("import", screen = %args.screen, files = args.files.len());
    let _guard = span.enter();

    let mut files = Vec::new();
    for path in &args.files {
        let outcome = match session.import_path(path) {
            Ok(report) => {
                debug!(
                    path = %path.display(),
                    accepted = report.accepted,
                    rejected = report.rejected.len(),
                    "file imported"
                );
                FileOutcome::Imported(report)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "file not imported");
                FileOutcome::Failed {
                    message: err.user_message(),
                    detail: err.to_string(),
                }
            }
        };
        files.push(FileSummary {
            path: path.clone(),
            outcome,
        });
    }
    for (index, entry) in session.table().entries().iter().enumerate() {
        trace!(
            index,
            cpf = redact_value(entry.get("cpf").unwrap_or_default()),
            "staged entry"
        );
    }

    let export = args.export.then(|| {
        let dir = args
            .output_dir
            .clone()
            .or_else(|| settings.export.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        match write_export(
            &dir,
            registry.company(),
            &company,
            session.screen(),
            session.table().entries(),
        ) {
            Ok(path) => ExportOutcome::Written(path),
            Err(err) => ExportOutcome::Failed {
                message: err.user_message().to_string(),
            },
        }
    });

    let submission = if args.submit {
        Some(submit(&session, args, settings)?)
    } else {
        None
    };

    info!(staged = session.table().len(), "import command finished");
    Ok(ImportResult {
        screen: session.screen().name.clone(),
        contract: company.contract_number().to_string(),
        files,
        staged: session.table().len(),
        export,
        submission,
    })
}

fn submit(
    session: &ImportSession,
    args: &ImportArgs,
    settings: &Settings,
) -> Result<SubmissionOutcome> {
    if args.dry_run {
        return Ok(match session.payload() {
            Ok(payload) => SubmissionOutcome::DryRun {
                payload: serde_json::to_string_pretty(&payload)
                    .context("serialize submission payload")?,
            },
            Err(err) => failed_submission(&err),
        });
    }
    let Some(endpoint) = args
        .endpoint
        .clone()
        .or_else(|| settings.submit.endpoint.clone())
    else {
        bail!(
            "no submission endpoint configured; pass --endpoint, set [submit] endpoint \
             or the {} environment variable",
            ENDPOINT_ENV
        );
    };
    let submitter = HttpSubmitter::new(endpoint, settings.submit.timeout())
        .context("create HTTP client")?;
    info!(endpoint = submitter.endpoint(), "submitting staged entries");
    Ok(match session.submit(&submitter) {
        Ok(records) => SubmissionOutcome::Sent { records },
        Err(err) => failed_submission(&err),
    })
}

fn failed_submission(err: &SessionError) -> SubmissionOutcome {
    SubmissionOutcome::Failed {
        message: err.user_message(),
        detail: err.to_string(),
    }
}

pub fn run_validate_record(args: &ValidateRecordArgs) -> Result<RecordResult> {
    let registry = load_registry()?;
    let mut session = ImportSession::open(&registry, &args.screen)?;
    session.set_company_field(CONTRACT_FIELD, args.contract.as_str());
    let form: BTreeMap<String, String> = args.values.iter().cloned().collect();
    for (field, value) in &form {
        debug!(field = %field, value = redact_value(value), "form value");
    }
    match session.register(&form) {
        Ok(index) => {
            let entry = session
                .table()
                .get(index)
                .context("saved entry missing from table")?;
            Ok(RecordResult::Valid(entry.merged()))
        }
        Err(err) => {
            let messages = err.field_messages();
            if messages.is_empty() {
                return Err(err.into());
            }
            Ok(RecordResult::Invalid(messages))
        }
    }
}
