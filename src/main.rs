mod commands;
mod config;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use designer::doc::MoveDirection;
use designer::error::ErrorCode;
use designer::records::RecordId;
use designer::render::ViewMode;
use tracing_subscriber::EnvFilter;

use crate::commands::Workspace;
use crate::config::DeletePolicyArg;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "formdesk=info,designer=info";

#[derive(Parser, Debug)]
#[command(name = "formdesk", about = "Form definition editor")]
struct Cli {
    /// Form definition file.
    #[arg(long, short, env = "FORMDESK_FORM", default_value = "form.json")]
    form: PathBuf,

    /// Submitted records file (a JSON array).
    #[arg(long, env = "FORMDESK_RECORDS")]
    records: Option<PathBuf>,

    /// Quiet period before edited JSON is parsed. Falls back to FORMDESK_DEBOUNCE_MS.
    #[arg(long)]
    debounce_ms: Option<u64>,

    #[arg(long, env = "FORMDESK_DELETE_POLICY", value_enum, default_value_t = DeletePolicyArg::WholeRow)]
    delete_policy: DeletePolicyArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a fresh document with one empty section.
    New {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        force: bool,
    },
    /// List the palette, optionally filtered by name or category.
    Palette {
        #[arg(default_value = "")]
        search: String,
    },
    /// Drop a new element. With neither --section nor --index it lands at the end of the first section.
    Drop {
        element_type: String,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        index: Option<usize>,
    },
    Delete {
        element_id: String,
    },
    Duplicate {
        element_id: String,
    },
    /// Change an element's type, keeping its id and metadata.
    Morph {
        element_id: String,
        element_type: String,
    },
    MoveRow {
        row_id: String,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    Rename {
        name: String,
    },
    /// Print a view mode (EDITOR, ADD, VIEW, UPDATE, LIST, FORM_JSON, FORM_DATA_JSON).
    Render {
        #[arg(default_value = "EDITOR")]
        mode: ViewMode,
        #[arg(long)]
        record: Option<RecordId>,
    },
    /// Submit field values. With --record, updates that record instead.
    Submit {
        /// FIELD=VALUE pairs.
        values: Vec<String>,
        #[arg(long)]
        record: Option<RecordId>,
    },
    DeleteRecord {
        id: RecordId,
    },
    /// Replace the document (or a record) from edited JSON text.
    Sync {
        file: PathBuf,
        #[arg(long)]
        record: Option<RecordId>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for MoveDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "command failed");
            Err(e)
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    if let Command::New { name, force } = &cli.command {
        return commands::new_form(&cli.form, name.as_deref(), *force);
    }

    let initial_mode = match &cli.command {
        Command::Render { mode, .. } => *mode,
        _ => ViewMode::Editor,
    };
    let config = config::editor_config(cli.debounce_ms, cli.delete_policy, initial_mode);
    let mut ws = Workspace::open(&cli.form, cli.records.as_deref(), config)?;

    match cli.command {
        Command::New { .. } => Ok(String::new()),
        Command::Palette { search } => Ok(commands::palette(&ws, &search)),
        Command::Drop { element_type, section, index } => {
            commands::drop_element(&mut ws, &element_type, section.as_deref(), index)
        }
        Command::Delete { element_id } => commands::delete_element(&mut ws, &element_id),
        Command::Duplicate { element_id } => commands::duplicate_element(&mut ws, &element_id),
        Command::Morph { element_id, element_type } => commands::morph_element(&mut ws, &element_id, &element_type),
        Command::MoveRow { row_id, direction } => commands::move_row(&mut ws, &row_id, direction.into()),
        Command::Rename { name } => commands::rename(&mut ws, &name),
        Command::Render { mode, record } => Ok(commands::render(&mut ws, mode, record)),
        Command::Submit { values, record } => commands::submit(&mut ws, &values, record),
        Command::DeleteRecord { id } => commands::delete_record(&mut ws, id),
        Command::Sync { file, record } => {
            let text = std::fs::read_to_string(&file).map_err(|e| CliError::io(&file, e))?;
            match record {
                Some(id) => commands::sync_record_text(&mut ws, id, &text).await,
                None => commands::sync_form_text(&mut ws, &text).await,
            }
        }
    }
}
