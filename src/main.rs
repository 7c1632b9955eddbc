use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sucursal_admin::api_client::api::DateRange;
use sucursal_admin::api_client::models::{Sucursal, SyncConfigUpdate};
use sucursal_admin::session::FileTokenStore;
use sucursal_admin::upload::BatchReport;
use sucursal_admin::{ApiClient, Config, Session, SessionEvent};

const USER_LOGOUT_REASON: &str = "requested by user";

#[derive(Debug, Parser)]
#[command(name = "sucursal-admin", version, about = "Administer sucursales, uploads and reports")]
struct Cli {
    /// Path to config.json (defaults to the app root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the token pair
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "SUCURSAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored tokens
    Logout,
    /// Check that the backend can reach its database
    DbStatus,
    /// List known tables
    Tables,
    CreateTables,
    Truncate {
        #[arg(required = true)]
        tables: Vec<String>,
    },
    DropTables {
        #[arg(required = true)]
        tables: Vec<String>,
    },
    /// Show rows of up to three tables
    TableData {
        #[arg(required = true)]
        tables: Vec<String>,
    },
    Sucursales {
        #[command(subcommand)]
        action: SucursalCommand,
    },
    /// Upload a date range for selected branches
    Upload {
        family: Family,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long = "sucursal", conflicts_with = "all")]
        sucursales: Vec<String>,
        #[arg(long)]
        all: bool,
    },
    /// Upload the last two days for every branch
    UploadLast { family: Family },
    TaskStatus { family: Family, task_id: String },
}

#[derive(Debug, Subcommand)]
enum SucursalCommand {
    List,
    Add {
        #[arg(long)]
        nombre: String,
        #[arg(long, default_value = "")]
        xir: String,
        #[arg(long, default_value = "")]
        xil: String,
        #[arg(long, default_value = "")]
        xiu: String,
        #[arg(long, default_value = "")]
        token: String,
    },
    /// Change selected fields of an existing branch
    Update {
        id: String,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        xir: Option<String>,
        #[arg(long)]
        xil: Option<String>,
        #[arg(long)]
        xiu: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    Delete { id: String },
    /// Configure automatic sync
    Sync {
        id: String,
        #[arg(long)]
        auto_sync: Option<bool>,
        /// Minutes between syncs
        #[arg(long)]
        interval: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Family {
    Sales,
    Inventory,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).await;
    let token_path = config.token_file_path()?;
    debug!(path = %token_path.display(), "Using token file");

    let session = Arc::new(Session::new(Arc::new(FileTokenStore::new(token_path))));
    let mut events = session.subscribe();
    let client = ApiClient::from_config(&config, session)?;

    let result = dispatch(&client, cli.command).await;
    report_session_events(&mut events);
    result
}

async fn dispatch(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            client.login(&username, &password).await?;
            println!("Logged in as {username}");
        }
        Command::Logout => client.logout(USER_LOGOUT_REASON),
        Command::DbStatus => {
            let status = client.database().check_database().await?;
            let label = if status.is_ok() { "Connection OK" } else { "Connection error" };
            println!("{label}: {}", status.message);
        }
        Command::Tables => print_json(&client.database().validate_tables().await?)?,
        Command::CreateTables => print_json(&client.database().create_tables().await?)?,
        Command::Truncate { tables } => {
            print_json(&client.database().truncate_tables(&tables).await?)?
        }
        Command::DropTables { tables } => {
            print_json(&client.database().delete_tables(&tables).await?)?
        }
        Command::TableData { tables } => {
            for snapshot in client.reports().table_snapshots(&tables).await? {
                println!("== {} ({} rows)", snapshot.table, snapshot.rows.len());
                println!("columns: {}", snapshot.columns().join(", "));
                print_json(&snapshot.rows)?;
            }
        }
        Command::Sucursales { action } => sucursales(client, action).await?,
        Command::Upload {
            family,
            start,
            end,
            sucursales,
            all,
        } => {
            let range = DateRange::new(start, end)?;
            let ids = if all {
                branch_ids(client).await?
            } else {
                sucursales
            };
            if ids.is_empty() {
                bail!("select at least one sucursal with --sucursal or use --all");
            }
            let report = match family {
                Family::Sales => client.sales().upload_for_branches(range, &ids).await,
                Family::Inventory => client.inventory().upload_for_branches(range, &ids).await,
            };
            summarize(&report)?;
        }
        Command::UploadLast { family } => {
            let data = match family {
                Family::Sales => client.sales().upload_last_for_all().await?,
                Family::Inventory => client.inventory().upload_last_for_all().await?,
            };
            print_json(&data)?;
        }
        Command::TaskStatus { family, task_id } => {
            let status = match family {
                Family::Sales => client.sales().task_status(&task_id).await?,
                Family::Inventory => client.inventory().task_status(&task_id).await?,
            };
            print_json(&status)?;
        }
    }
    Ok(())
}

async fn sucursales(client: &ApiClient, action: SucursalCommand) -> Result<()> {
    let api = client.sucursales();
    match action {
        SucursalCommand::List => {
            for sucursal in api.list().await? {
                let sync = match (sucursal.auto_sync, sucursal.sync_interval) {
                    (Some(true), Some(minutes)) => format!("auto every {minutes} min"),
                    (Some(true), None) => "auto".to_string(),
                    _ => "manual".to_string(),
                };
                println!("{}  [{sync}]", sucursal.label());
            }
        }
        SucursalCommand::Add {
            nombre,
            xir,
            xil,
            xiu,
            token,
        } => {
            let created = api
                .create(&Sucursal {
                    nombre,
                    xir,
                    xil,
                    xiu,
                    token,
                    ..Default::default()
                })
                .await?;
            print_json(&created)?;
        }
        SucursalCommand::Update {
            id,
            nombre,
            xir,
            xil,
            xiu,
            token,
        } => {
            let mut current = api
                .list()
                .await?
                .into_iter()
                .find(|s| s.id.as_deref() == Some(id.as_str()))
                .with_context(|| format!("sucursal {id} not found"))?;
            if let Some(value) = nombre {
                current.nombre = value;
            }
            if let Some(value) = xir {
                current.xir = value;
            }
            if let Some(value) = xil {
                current.xil = value;
            }
            if let Some(value) = xiu {
                current.xiu = value;
            }
            if let Some(value) = token {
                current.token = value;
            }
            print_json(&api.update(&id, &current).await?)?;
        }
        SucursalCommand::Delete { id } => {
            api.delete(&id).await?;
            println!("Deleted sucursal {id}");
        }
        SucursalCommand::Sync {
            id,
            auto_sync,
            interval,
        } => {
            let update = SyncConfigUpdate {
                auto_sync,
                sync_interval: interval,
            };
            print_json(&api.update_sync_config(&id, &update).await?)?;
        }
    }
    Ok(())
}

async fn branch_ids(client: &ApiClient) -> Result<Vec<String>> {
    Ok(client
        .sucursales()
        .list()
        .await?
        .into_iter()
        .filter_map(|s| s.id)
        .collect())
}

fn summarize(report: &BatchReport) -> Result<()> {
    print_json(report)?;
    let failed: Vec<&str> = report.failed().map(|o| o.sucursal_id.as_str()).collect();
    if !failed.is_empty() {
        bail!("upload failed for sucursales: {}", failed.join(", "));
    }
    println!("Upload finished for {} sucursales", report.outcomes.len());
    Ok(())
}

fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        if let Some(notice) = session_notice(&event) {
            eprintln!("{notice}");
        }
    }
}

fn session_notice(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::LoggedOut { reason } if reason == USER_LOGOUT_REASON => {
            Some("Logged out".to_string())
        }
        SessionEvent::LoggedOut { reason } => Some(format!(
            "Session ended ({reason}). Run `sucursal-admin login` to sign in again."
        )),
        _ => None,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
