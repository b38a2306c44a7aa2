use std::error::Error;
use std::path::PathBuf;

use cpn_adapters::catalog;
use cpnflow_rust::config::{init_dotenv, SETTINGS};
use cpnflow_rust::runner::{lineage_path, TaskRunner};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Uso:
  cpnflow list
  cpnflow describe <component>
  cpnflow execute --config <task.json> [--lineage <out.json>] [--strict]";

/// Fila de `cpnflow list`.
#[derive(Serialize)]
struct ComponentListing {
    name: String,
    version: String,
    roles: Vec<String>,
}

enum CliError {
    Usage(String),
    Failed(Box<dyn Error>),
}

impl<E: Error + 'static> From<E> for CliError {
    fn from(err: E) -> Self {
        CliError::Failed(Box::new(err))
    }
}

fn main() {
    init_dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_target(false)
                             .with_writer(std::io::stderr)
                             .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("[cpnflow] {msg}\n{USAGE}");
            std::process::exit(2);
        }
        Err(CliError::Failed(err)) => {
            eprintln!("[cpnflow] error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), CliError> {
    match args.get(1).map(String::as_str) {
        Some("list") => list(),
        Some("describe") => {
            let name = args.get(2).ok_or_else(|| CliError::Usage("describe requiere un componente".into()))?;
            describe(name)
        }
        Some("execute") => execute(&args[2..]),
        Some(other) => Err(CliError::Usage(format!("comando desconocido `{other}`"))),
        None => Err(CliError::Usage("falta el comando".into())),
    }
}

fn list() -> Result<(), CliError> {
    let mut rows = Vec::new();
    for component in catalog() {
        let d = component.descriptor()?;
        rows.push(ComponentListing { name: d.name().to_string(),
                                     version: d.version().to_string(),
                                     roles: d.roles().iter().map(ToString::to_string).collect() });
    }
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn describe(name: &str) -> Result<(), CliError> {
    let component = cpn_adapters::find(name).ok_or_else(|| CliError::Usage(format!("componente desconocido `{name}`")))?;
    let summary = component.descriptor()?.describe();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn execute(args: &[String]) -> Result<(), CliError> {
    let mut config: Option<PathBuf> = None;
    let mut lineage: Option<PathBuf> = None;
    let mut strict = SETTINGS.strict_config;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config = args.get(i).map(PathBuf::from);
            }
            "--lineage" => {
                i += 1;
                lineage = args.get(i).map(PathBuf::from);
            }
            "--strict" => strict = true,
            other => return Err(CliError::Usage(format!("argumento desconocido `{other}`"))),
        }
        i += 1;
    }
    let config_path = config.ok_or_else(|| CliError::Usage("execute requiere --config <task.json>".into()))?;

    let task = TaskRunner::load_config(&config_path)?;
    tracing::debug!(settings = ?*SETTINGS, task_id = %task.task_id, "loaded task config");
    let runner = TaskRunner::from_settings(&SETTINGS).strict_config(strict);
    let record = runner.run(&task)?;

    match lineage_path(lineage, &SETTINGS, &task.task_id) {
        Some(path) => {
            record.save(&path)?;
            tracing::info!("lineage saved to {}", path.display());
        }
        None => println!("{}", record.to_json_pretty()?),
    }
    Ok(())
}
