use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use cardstack::core::error::{EngineError, WireError};
use cardstack::kernel::services::adapters::{load_settings, CallbackRegistry};
use cardstack::kernel::services::ports::EngineSettings;
use cardstack::kernel::{Engine, EntryPoint};
use cardstack::wire;

mod logging;

const USAGE: &str = "usage:
  cardstack check <doc.json>
  cardstack replay <doc.json> <responses.json>";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn read(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(Path::new(path)).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

/// Validates every card and prints the document in canonical form.
fn check(doc_path: &str) -> Result<(), CliError> {
    let doc = wire::parse_document(&read(doc_path)?)?;
    tracing::info!(path = doc_path, cards = doc.cards.len(), "document valid");
    println!("{}", wire::print_json(&doc)?);
    Ok(())
}

/// Stacks the document's cards, applies each recorded response in order and
/// prints the effects of every step, then the final stack.
fn replay(doc_path: &str, responses_path: &str, settings: EngineSettings) -> Result<(), CliError> {
    let doc = wire::parse_document(&read(doc_path)?)?;
    let responses = wire::parse_responses(&read(responses_path)?)?;

    let engine = Engine::new(Arc::new(CallbackRegistry::new()), settings);
    let session = engine.open_session_with(doc.cards, EntryPoint::Homepage)?;

    for (step, response) in responses.into_iter().enumerate() {
        let line = match engine.apply_response(&session, response) {
            Ok(applied) => serde_json::json!({
                "step": step,
                "changed": applied.changed,
                "effects": applied.effects,
            }),
            Err(e) => {
                tracing::warn!(step, error = %e, "replay step rejected");
                serde_json::json!({ "step": step, "error": e.to_string() })
            }
        };
        println!("{}", serde_json::to_string(&line)?);
        if session.is_closed() {
            break;
        }
    }

    let summary = serde_json::json!({
        "stack": session.stack_names(),
        "dialogs": session.dialog_depth(),
        "closed": session.is_closed(),
    });
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = load_settings().unwrap_or_else(|e| {
        eprintln!("ignoring settings: {e}");
        EngineSettings::default()
    });
    let _logging = logging::init(&settings.log_filter);

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = match args.as_slice() {
        ["check", doc] => check(doc),
        ["replay", doc, responses] => replay(doc, responses, settings),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
