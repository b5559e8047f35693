use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use auth::{AuthStore, FileTokenStore, LoginCredentials};
use client_core::{CredentialCell, HttpClient, SessionEvents};
use pagination::SortDirection;
use parts::{CreatePart, PartsApi, PartsStore, UpdatePart};
use records::{CreateRecord, RecordsApi, RecordsStore, UpdateRecord};
use routing::{evaluate, Navigation, RouteId};
use runtime::{AppConfig, CliArgs};

/// Inventory client - bicycle parts and vinyl records over the REST backend
#[derive(Parser)]
#[command(name = "inventory-cli")]
#[command(about = "Inventory client for the bicycle-parts / vinyl-records backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// API base URL (overrides config)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        username: String,
        password: String,
    },
    /// Drop the persisted session
    Logout,
    /// Show the current session identity
    Whoami,
    /// Manage bicycle parts (requires the parts role)
    Parts {
        #[command(subcommand)]
        command: PartsCommand,
    },
    /// Manage vinyl records (requires the records role)
    Records {
        #[command(subcommand)]
        command: RecordsCommand,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Page number (0-based)
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Page size
    #[arg(long, default_value_t = 20)]
    size: u32,

    /// Sort field
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending (with --sort)
    #[arg(long)]
    desc: bool,
}

#[derive(Subcommand)]
enum PartsCommand {
    /// List parts (paginated)
    List {
        #[command(flatten)]
        args: ListArgs,
        /// Only parts of this type (FRAME, BRAKE, TIRE, PUMP, OTHER)
        #[arg(long, value_name = "TYPE")]
        part_type: Option<parts::PartType>,
    },
    /// Show one part
    Get { id: i64 },
    /// Free-text search
    Search { query: String },
    /// Create a part
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "TYPE")]
        part_type: parts::PartType,
        #[arg(long)]
        location: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        condition: parts::PartCondition,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update a part (only the given fields change)
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_name = "TYPE")]
        part_type: Option<parts::PartType>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        quantity: Option<u32>,
        #[arg(long)]
        condition: Option<parts::PartCondition>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a part
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum RecordsCommand {
    /// List records (paginated)
    List {
        #[command(flatten)]
        args: ListArgs,
        /// Only records of this genre (ROCK, JAZZ, ...)
        #[arg(long)]
        genre: Option<records::Genre>,
    },
    /// Show one record
    Get { id: i64 },
    /// Free-text search
    Search { query: String },
    /// Create a record
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        artist: String,
        #[arg(long)]
        release_year: i32,
        #[arg(long)]
        genre: records::Genre,
        #[arg(long)]
        condition: records::RecordCondition,
        #[arg(long)]
        purchase_source: Option<String>,
        #[arg(long)]
        purchase_date: Option<chrono::NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update a record (only the given fields change)
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        release_year: Option<i32>,
        #[arg(long)]
        genre: Option<records::Genre>,
        #[arg(long)]
        condition: Option<records::RecordCondition>,
        #[arg(long)]
        purchase_source: Option<String>,
        #[arg(long)]
        purchase_date: Option<chrono::NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a record
    Delete { id: i64 },
}

/// Everything wired together: one HTTP client, one auth store, one store per
/// collection (plus the bare API handles for single-entity lookups).
struct App {
    auth: Arc<AuthStore>,
    parts: PartsStore,
    parts_api: PartsApi,
    records: RecordsStore,
    records_api: RecordsApi,
}

impl App {
    fn build(config: &AppConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.api.timeout_sec > 0 {
            builder = builder.timeout(Duration::from_secs(config.api.timeout_sec));
        }
        let inner = builder.build()?;

        let credentials = Arc::new(CredentialCell::new());
        let events = Arc::new(SessionEvents::new());
        let http = HttpClient::with_inner(inner, &config.api.base_url, credentials, events);

        let tokens = Arc::new(FileTokenStore::new(config.home_dir()));
        let auth = AuthStore::new(http.clone(), tokens);

        let parts_api = PartsApi::new(http.clone());
        let records_api = RecordsApi::new(http);
        Ok(Self {
            auth,
            parts: PartsStore::new(parts_api.clone()),
            parts_api,
            records: RecordsStore::new(records_api.clone()),
            records_api,
        })
    }

    /// Restore the session if needed and run the route guard for `target`.
    async fn guard(&self, target: RouteId) -> Result<()> {
        let mut decision = evaluate(target, &self.auth.state());
        if decision == Navigation::AwaitSession {
            self.auth.restore_session().await;
            decision = evaluate(target, &self.auth.state());
        }

        match decision {
            Navigation::Proceed => Ok(()),
            Navigation::Redirect(RouteId::Login) => {
                bail!("not logged in; run `inventory-cli login <username> <password>` first")
            }
            Navigation::Redirect(RouteId::Unauthorized) => {
                bail!("your role does not allow access to {}", target.path())
            }
            Navigation::Redirect(route) => bail!("redirected to {}", route.path()),
            Navigation::AwaitSession => bail!("session state could not be determined"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.clone(),
        base_url: cli.base_url.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, config.home_dir());
    tracing::debug!(base_url = %config.api.base_url, "inventory client starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let app = App::build(&config)?;

    match cli.command {
        Command::Login { username, password } => login(&app, username, password).await,
        Command::Logout => {
            // Settle the session first so logout reports what it dropped.
            app.auth.restore_session().await;
            let was = app.auth.current_user();
            app.auth.logout();
            match was {
                Some(user) => println!("Logged out {}", user.username),
                None => println!("No active session"),
            }
            Ok(())
        }
        Command::Whoami => {
            app.auth.restore_session().await;
            match app.auth.current_user() {
                Some(user) => {
                    println!("{} ({})", user.username, user.role.as_str());
                    Ok(())
                }
                None => bail!("not logged in"),
            }
        }
        Command::Parts { command } => {
            app.guard(RouteId::Parts).await?;
            run_parts(&app, command).await
        }
        Command::Records { command } => {
            app.guard(RouteId::Records).await?;
            run_records(&app, command).await
        }
    }
}

async fn login(app: &App, username: String, password: String) -> Result<()> {
    let ok = app
        .auth
        .login(&LoginCredentials { username, password })
        .await;
    if !ok {
        bail!("login failed: check the username and password");
    }
    let user = app
        .auth
        .current_user()
        .ok_or_else(|| anyhow::anyhow!("session missing after login"))?;
    println!(
        "Logged in as {} ({}); try `inventory-cli {} list`",
        user.username,
        user.role.as_str(),
        RouteId::landing_for(user.role).path().trim_start_matches('/'),
    );
    Ok(())
}

/// Bail with the store's error banner, if one is set.
fn check_store_error(error: Option<String>) -> Result<()> {
    match error {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

fn client_error_message(e: &client_core::ClientError) -> String {
    match e.as_api() {
        Some(api) => api.user_message(),
        None => e.to_string(),
    }
}

fn print_validation_errors(errors: &std::collections::HashMap<String, String>) {
    let mut fields: Vec<_> = errors.iter().collect();
    fields.sort();
    for (field, message) in fields {
        eprintln!("  {field}: {message}");
    }
}

async fn run_parts(app: &App, command: PartsCommand) -> Result<()> {
    let store = &app.parts;
    match command {
        PartsCommand::List { args, part_type } => {
            store.set_page_size(args.size);
            let direction = if args.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            store.set_sort(args.sort, direction);
            match part_type {
                Some(part_type) => store.set_type_filter(Some(part_type)).await,
                None => store.fetch_all(args.page).await,
            }
            check_store_error(store.error())?;
            print_parts(&store.visible());
            if store.is_paginated() {
                println!(
                    "page {}/{} - {} parts total",
                    store.current_page() + 1,
                    store.total_pages().max(1),
                    store.total_elements()
                );
            }
            Ok(())
        }
        PartsCommand::Get { id } => match app.parts_api.get(id).await {
            Ok(part) => {
                print_parts(&[part]);
                Ok(())
            }
            Err(e) => bail!("{}", client_error_message(&e)),
        },
        PartsCommand::Search { query } => {
            store.search(&query).await;
            check_store_error(store.error())?;
            print_parts(&store.visible());
            Ok(())
        }
        PartsCommand::Create {
            name,
            part_type,
            location,
            quantity,
            condition,
            description,
            notes,
        } => {
            let part = CreatePart {
                name,
                description,
                part_type,
                location,
                quantity,
                condition,
                notes,
            };
            let errors = parts::validate::validate_new_part(&part);
            if !errors.is_empty() {
                eprintln!("invalid part:");
                print_validation_errors(&errors);
                bail!("validation failed");
            }
            match store.create(&part).await {
                Ok(created) => {
                    println!("Created part {} ({})", created.id, created.name);
                    Ok(())
                }
                Err(e) => {
                    if let Some(map) = e.as_api().and_then(|a| a.validation_errors.as_ref()) {
                        eprintln!("rejected by the server:");
                        print_validation_errors(map);
                    }
                    check_store_error(store.error())
                }
            }
        }
        PartsCommand::Update {
            id,
            name,
            part_type,
            location,
            quantity,
            condition,
            description,
            notes,
        } => {
            let patch = UpdatePart {
                name,
                description,
                part_type,
                location,
                quantity,
                condition,
                notes,
            };
            let errors = parts::validate::validate_part_patch(&patch);
            if !errors.is_empty() {
                eprintln!("invalid part:");
                print_validation_errors(&errors);
                bail!("validation failed");
            }
            match store.update(id, &patch).await {
                Ok(updated) => {
                    println!("Updated part {} ({})", updated.id, updated.name);
                    Ok(())
                }
                Err(e) => {
                    if let Some(map) = e.as_api().and_then(|a| a.validation_errors.as_ref()) {
                        eprintln!("rejected by the server:");
                        print_validation_errors(map);
                    }
                    check_store_error(store.error())
                }
            }
        }
        PartsCommand::Delete { id } => match store.delete(id).await {
            Ok(()) => {
                println!("Deleted part {id}");
                Ok(())
            }
            Err(_) => check_store_error(store.error()),
        },
    }
}

async fn run_records(app: &App, command: RecordsCommand) -> Result<()> {
    let store = &app.records;
    match command {
        RecordsCommand::List { args, genre } => {
            store.set_page_size(args.size);
            let direction = if args.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            store.set_sort(args.sort, direction);
            match genre {
                Some(genre) => store.set_genre_filter(Some(genre)).await,
                None => store.fetch_all(args.page).await,
            }
            check_store_error(store.error())?;
            print_records(&store.visible());
            if store.is_paginated() {
                println!(
                    "page {}/{} - {} records total",
                    store.current_page() + 1,
                    store.total_pages().max(1),
                    store.total_elements()
                );
            }
            Ok(())
        }
        RecordsCommand::Get { id } => match app.records_api.get(id).await {
            Ok(record) => {
                print_records(&[record]);
                Ok(())
            }
            Err(e) => bail!("{}", client_error_message(&e)),
        },
        RecordsCommand::Search { query } => {
            store.search(&query).await;
            check_store_error(store.error())?;
            print_records(&store.visible());
            Ok(())
        }
        RecordsCommand::Create {
            title,
            artist,
            release_year,
            genre,
            condition,
            purchase_source,
            purchase_date,
            notes,
        } => {
            let record = CreateRecord {
                title,
                artist,
                release_year,
                genre,
                purchase_source,
                purchase_date,
                condition,
                notes,
            };
            let errors = records::validate::validate_new_record(&record);
            if !errors.is_empty() {
                eprintln!("invalid record:");
                print_validation_errors(&errors);
                bail!("validation failed");
            }
            match store.create(&record).await {
                Ok(created) => {
                    println!("Created record {} ({})", created.id, created.title);
                    Ok(())
                }
                Err(e) => {
                    if let Some(map) = e.as_api().and_then(|a| a.validation_errors.as_ref()) {
                        eprintln!("rejected by the server:");
                        print_validation_errors(map);
                    }
                    check_store_error(store.error())
                }
            }
        }
        RecordsCommand::Update {
            id,
            title,
            artist,
            release_year,
            genre,
            condition,
            purchase_source,
            purchase_date,
            notes,
        } => {
            let patch = UpdateRecord {
                title,
                artist,
                release_year,
                genre,
                purchase_source,
                purchase_date,
                condition,
                notes,
            };
            let errors = records::validate::validate_record_patch(&patch);
            if !errors.is_empty() {
                eprintln!("invalid record:");
                print_validation_errors(&errors);
                bail!("validation failed");
            }
            match store.update(id, &patch).await {
                Ok(updated) => {
                    println!("Updated record {} ({})", updated.id, updated.title);
                    Ok(())
                }
                Err(e) => {
                    if let Some(map) = e.as_api().and_then(|a| a.validation_errors.as_ref()) {
                        eprintln!("rejected by the server:");
                        print_validation_errors(map);
                    }
                    check_store_error(store.error())
                }
            }
        }
        RecordsCommand::Delete { id } => match store.delete(id).await {
            Ok(()) => {
                println!("Deleted record {id}");
                Ok(())
            }
            Err(_) => check_store_error(store.error()),
        },
    }
}

fn print_parts(items: &[parts::Part]) {
    if items.is_empty() {
        println!("(no parts)");
        return;
    }
    println!(
        "{:>6}  {:<24}  {:<8}  {:<16}  {:>4}  {:<10}",
        "id", "name", "type", "location", "qty", "condition"
    );
    for part in items {
        println!(
            "{:>6}  {:<24}  {:<8}  {:<16}  {:>4}  {:<10}",
            part.id,
            part.name,
            part.part_type.as_str(),
            part.location,
            part.quantity,
            part.condition.label(),
        );
    }
}

fn print_records(items: &[records::VinylRecord]) {
    if items.is_empty() {
        println!("(no records)");
        return;
    }
    println!(
        "{:>6}  {:<28}  {:<20}  {:>4}  {:<10}  {:<10}",
        "id", "title", "artist", "year", "genre", "condition"
    );
    for record in items {
        println!(
            "{:>6}  {:<28}  {:<20}  {:>4}  {:<10}  {:<10}",
            record.id,
            record.title,
            record.artist,
            record.release_year,
            record.genre.label(),
            record.condition.label(),
        );
    }
}
