#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use swapsched::{
    config::Settings,
    console::{ConsoleError, ScheduleConsole},
    io,
    messages::{MessageRenderer, PlainMessages},
    model::{ScheduleId, ScheduleQuery, ShiftRequest, ShiftStatus, StaffId, StationId},
    storage::{JsonSessionStore, Session, SessionStore},
    validator::{normalize_raw, validate_duration, ScheduleForm, ValidationError},
    HttpBackend,
};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Contrôle et envoi des plannings du personnel des stations
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier de configuration TOML
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// URL de base de l'API (prioritaire sur la configuration)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Décalage horaire des stations, ex. `+07:00`
    #[arg(long, global = true)]
    utc_offset: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(clap::Args, Debug)]
struct ShiftArgs {
    #[arg(long)]
    staff: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// HH:MM
    #[arg(long)]
    start: String,
    /// HH:MM ; <= start pour un shift de nuit
    #[arg(long)]
    end: String,
    #[arg(long)]
    station: Option<String>,
    #[arg(long, default_value = "scheduled")]
    status: String,
    #[arg(long)]
    notes: Option<String>,
}

impl ShiftArgs {
    fn into_request(self) -> Result<ShiftRequest> {
        let status: ShiftStatus = self.status.parse()?;
        let mut request = ShiftRequest::new(self.staff, self.date, self.start, self.end);
        request.station_id = self.station;
        request.status = status;
        request.notes = self.notes;
        Ok(request)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer les instants absolus d'un shift
    Normalize {
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Vérifier un shift sans l'envoyer
    Check {
        #[command(flatten)]
        shift: ShiftArgs,
        /// Planning en cours d'édition (exclu des conflits)
        #[arg(long)]
        exclude: Option<String>,
        /// Liste JSON de shifts existants (contrôle hors ligne)
        #[arg(long)]
        shifts: Option<PathBuf>,
    },

    /// Lister les plannings
    List {
        #[arg(long)]
        staff: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        station: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        out_json: Option<PathBuf>,
        #[arg(long)]
        out_csv: Option<PathBuf>,
    },

    /// Créer un shift
    Create {
        #[command(flatten)]
        shift: ShiftArgs,
    },

    /// Modifier un shift existant
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        shift: ShiftArgs,
    },

    /// Supprimer un shift
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Importer des shifts depuis un CSV
    Import {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Enregistrer le jeton de session
    Login {
        #[arg(long)]
        token: String,
    },

    /// Oublier le jeton de session
    Logout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    if let Some(offset) = cli.utc_offset {
        settings.utc_offset = offset;
    }
    settings.validate()?;

    let policy = settings.policy()?;
    let sessions = JsonSessionStore::open(&settings.session_file);
    let messages = PlainMessages;

    let code = match cli.cmd {
        Commands::Normalize { date, start, end } => {
            match normalize_raw(&date, &start, &end, policy.utc_offset) {
                Ok(shift) => {
                    println!(
                        "{} → {} | overnight: {} | {} min",
                        shift.absolute_start.to_rfc3339(),
                        shift.absolute_end.to_rfc3339(),
                        shift.is_overnight,
                        shift.duration_minutes()
                    );
                    match validate_duration(shift.absolute_start, shift.absolute_end, &policy) {
                        Ok(()) => 0,
                        Err(err) => {
                            eprintln!("{}", messages.duration(&err));
                            1
                        }
                    }
                }
                Err(errors) => {
                    eprintln!(
                        "{}",
                        messages.validation(&ValidationError::InvalidFields(errors))
                    );
                    1
                }
            }
        }
        Commands::Check {
            shift,
            exclude,
            shifts,
        } => {
            let request = shift.into_request()?;
            let mut form = match shifts {
                Some(path) => {
                    let mut form = ScheduleForm::with_request(request, policy);
                    let ticket = form.begin_fetch();
                    form.apply_fetch(ticket, io::load_shifts_json(path)?);
                    form
                }
                None => console(&settings, &sessions)?.open_form(request)?,
            };
            form.set_editing(exclude.map(ScheduleId::new));
            match form.submit() {
                Ok(payload) => {
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                    0
                }
                Err(err) => report_validation(&messages, &err),
            }
        }
        Commands::List {
            staff,
            date,
            station,
            status,
            page,
            limit,
            out_json,
            out_csv,
        } => {
            let query = ScheduleQuery {
                staff_id: staff.map(StaffId::new),
                shift_date: date
                    .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
                    .transpose()
                    .context("date must be YYYY-MM-DD")?,
                station_id: station.map(StationId::new),
                status: status.map(|s| s.parse::<ShiftStatus>()).transpose()?,
                page: Some(page),
                limit: Some(limit.unwrap_or(settings.page_size)),
            };
            let result = console(&settings, &sessions)?.list(&query);
            match result {
                Ok(page) => {
                    if let Some(path) = out_json {
                        io::export_shifts_json(path, &page.schedules)?;
                    }
                    if let Some(path) = out_csv {
                        io::export_shifts_csv(path, &page.schedules)?;
                    }
                    for s in &page.schedules {
                        println!(
                            "{} | {} | {} → {} | {}",
                            s.schedule_id.as_str(),
                            s.staff_id.as_str(),
                            s.shift_start.to_rfc3339(),
                            s.shift_end.to_rfc3339(),
                            s.status
                        );
                    }
                    println!(
                        "page {}/{} ({} total)",
                        page.pagination.page, page.pagination.total_pages, page.pagination.total
                    );
                    0
                }
                Err(err) => {
                    eprintln!("{}", messages.backend(&err));
                    1
                }
            }
        }
        Commands::Create { shift } => {
            let console = console(&settings, &sessions)?;
            let form = console.open_form(shift.into_request()?)?;
            finish_submit(&messages, console.submit(&form))
        }
        Commands::Update { id, shift } => {
            let console = console(&settings, &sessions)?;
            let mut form = console.open_form(shift.into_request()?)?;
            form.set_editing(Some(ScheduleId::new(id)));
            finish_submit(&messages, console.submit(&form))
        }
        Commands::Delete { id } => {
            match console(&settings, &sessions)?.delete(&ScheduleId::new(&id)) {
                Ok(()) => {
                    println!("Deleted {id}");
                    0
                }
                Err(err) => {
                    eprintln!("{}", messages.backend(&err));
                    1
                }
            }
        }
        Commands::Import { csv } => {
            let requests = io::import_requests_csv(csv)?;
            let report = console(&settings, &sessions)?.import_batch(requests);
            for shift in &report.created {
                println!("Created {}", shift.schedule_id.as_str());
            }
            for rejected in &report.rejected {
                eprintln!(
                    "row {}: {}",
                    rejected.row,
                    render_console_error(&messages, &rejected.error)
                );
            }
            if report.rejected.is_empty() {
                0
            } else {
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Login { token } => {
            sessions.save(&Session::new(token))?;
            println!("Session saved to {}", sessions.path().display());
            0
        }
        Commands::Logout => {
            sessions.clear()?;
            println!("Session cleared");
            0
        }
    };

    std::process::exit(code);
}

fn console(
    settings: &Settings,
    sessions: &JsonSessionStore,
) -> Result<ScheduleConsole<HttpBackend>> {
    let token = sessions.load()?.map(|s| s.token);
    let backend = HttpBackend::new(settings, token)?;
    Ok(ScheduleConsole::new(backend, settings.policy()?))
}

/// Code 2 = conflit (envoi bloqué), 1 = autre refus.
fn report_validation(messages: &PlainMessages, err: &ValidationError) -> i32 {
    eprintln!("{}", messages.validation(err));
    match err {
        ValidationError::Conflict(_) => 2,
        _ => 1,
    }
}

fn render_console_error(messages: &PlainMessages, err: &ConsoleError) -> String {
    match err {
        ConsoleError::Validation(v) => messages.validation(v),
        ConsoleError::Backend(b) => messages.backend(b),
        ConsoleError::Closed => err.to_string(),
    }
}

fn finish_submit(
    messages: &PlainMessages,
    result: Result<swapsched::ExistingShift, ConsoleError>,
) -> i32 {
    match result {
        Ok(saved) => {
            println!("Saved {}", saved.schedule_id.as_str());
            0
        }
        Err(ConsoleError::Validation(err)) => report_validation(messages, &err),
        Err(err) => {
            eprintln!("{}", render_console_error(messages, &err));
            1
        }
    }
}
