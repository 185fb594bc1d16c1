//! services/docvault/src/bin/docvault.rs

use docvault_core::{ActionState, Confirm, DocumentId, ExportFormat, NewDocument, SortOption};
use docvault_lib::{
    adapters::{AutoConfirm, StdinConfirm},
    config::Config,
    error::AppError,
    workflows::{
        AppState, BatchProcessing, CategoryManager, DocumentLibrary, DocumentUpload,
        VersionHistory,
    },
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "docvault [--yes] [--sort newest|oldest|name|size] <stats|list|search <q>|compare <id1> <id2>|versions <id>|\
process <ids..>|export <format> <ids..>|categories|delete <id>|upload <path> [title]>";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Using backend at {}", config.api_url);

    // --- 2. Build the Shared AppState ---
    let (flags, args) = parse_flags(std::env::args().skip(1))?;
    let confirm: Arc<dyn Confirm> = if flags.assume_yes {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(StdinConfirm)
    };
    let app_state = AppState::connect(config, confirm)?;

    // --- 3. Run the Requested Command ---
    let (command, rest) = args
        .split_first()
        .ok_or_else(|| AppError::Usage(USAGE.to_string()))?;

    match command.as_str() {
        "stats" => {
            let mut library = DocumentLibrary::new(&app_state);
            settle(library.refresh().await)?;
            print_json(&library.stats().summary())
        }
        "list" => {
            let mut library = DocumentLibrary::new(&app_state);
            library.set_sort(flags.sort);
            settle(library.refresh().await)?;
            print_json(&library.visible())
        }
        "search" => {
            let q = rest.join(" ");
            let mut library = DocumentLibrary::new(&app_state);
            library.set_sort(flags.sort);
            settle(library.search(&q).await)?;
            print_json(&library.visible())
        }
        "compare" => {
            let (first, second) = match parse_ids(rest)?.as_slice() {
                [first, second] => (*first, *second),
                _ => return Err(AppError::Usage("docvault compare <id1> <id2>".to_string())),
            };
            let mut history = VersionHistory::new(&app_state, second);
            history.toggle(first);
            history.toggle(second);
            let comparison = settle(history.compare().await)?;
            print_json(&comparison)
        }
        "versions" => {
            let id = single_id(rest, "docvault versions <id>")?;
            let mut history = VersionHistory::new(&app_state, id);
            settle(history.load().await)?;
            print_json(&history.versions())
        }
        "process" => {
            let mut batch = BatchProcessing::new(&app_state, Vec::new());
            for id in parse_ids(rest)? {
                batch.toggle(id);
            }
            print_json(&settle(batch.process().await)?)
        }
        "export" => {
            let (format, ids) = rest
                .split_first()
                .ok_or_else(|| AppError::Usage("docvault export <format> <ids..>".to_string()))?;
            let format = format.parse::<ExportFormat>().map_err(AppError::Usage)?;
            let mut batch = BatchProcessing::new(&app_state, Vec::new());
            batch.set_export_format(format);
            for id in parse_ids(ids)? {
                batch.toggle(id);
            }
            print_json(&settle(batch.export().await)?)
        }
        "categories" => {
            let mut manager = CategoryManager::new(&app_state);
            settle(manager.load().await)?;
            print_json(&manager.categories())
        }
        "delete" => {
            let id = single_id(rest, "docvault delete <id>")?;
            let mut library = DocumentLibrary::new(&app_state);
            match settle(library.delete(id).await)? {
                Some(id) => info!("Document {} deleted", id),
                None => info!("Deletion cancelled"),
            }
            Ok(())
        }
        "upload" => {
            let (path, title) = rest
                .split_first()
                .ok_or_else(|| AppError::Usage("docvault upload <path> [title]".to_string()))?;
            let content = tokio::fs::read(path).await?;
            let file_name = Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            let mut file = NewDocument::new(file_name, content);
            if !title.is_empty() {
                file.title = Some(title.join(" "));
            }
            let mut upload = DocumentUpload::new(&app_state);
            print_json(&settle(upload.upload(file).await)?)
        }
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}

#[derive(Debug, Default, PartialEq)]
struct Flags {
    assume_yes: bool,
    sort: SortOption,
}

/// Splits the global flags off the command line. They may appear anywhere.
fn parse_flags(mut args: impl Iterator<Item = String>) -> Result<(Flags, Vec<String>), AppError> {
    let mut flags = Flags::default();
    let mut rest = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--yes" => flags.assume_yes = true,
            "--sort" => {
                let value = args
                    .next()
                    .ok_or_else(|| AppError::Usage("--sort needs a value".to_string()))?;
                flags.sort = value.parse::<SortOption>().map_err(AppError::Usage)?;
            }
            _ => rest.push(arg),
        }
    }
    Ok((flags, rest))
}

/// Turns the end state of an action into a result. `None` means the action
/// never started, e.g. a declined confirmation.
fn settle<T: Clone>(state: &ActionState<T>) -> Result<Option<T>, AppError> {
    match state {
        ActionState::Succeeded(value) => Ok(Some(value.clone())),
        ActionState::Failed(err) => Err(err.clone().into()),
        ActionState::Idle | ActionState::InFlight => Ok(None),
    }
}

fn parse_ids(args: &[String]) -> Result<Vec<DocumentId>, AppError> {
    args.iter()
        .map(|raw| {
            raw.parse::<DocumentId>()
                .map_err(|_| AppError::Usage(format!("'{}' is not a document id", raw)))
        })
        .collect()
}

fn single_id(args: &[String], usage: &str) -> Result<DocumentId, AppError> {
    match parse_ids(args)?.as_slice() {
        [id] => Ok(*id),
        _ => Err(AppError::Usage(usage.to_string())),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
