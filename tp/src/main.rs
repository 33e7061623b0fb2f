//! TripPlanner - AI travel itinerary editor
//!
//! CLI entry point. Each invocation loads the session file, applies one
//! command and writes the session back.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, bail};
use tracing::{debug, info, warn};

use tripplanner::calendar::{DateRange, DateRangePicker, today_local};
use tripplanner::chat::ChatStore;
use tripplanner::cli::{self, Cli, Command, parse_date_arg};
use tripplanner::config::Config;
use tripplanner::drag::{DragController, DragEvent, DragOutcome, DragSource, DropTarget};
use tripplanner::planner::{self, PlanForm, SubmitError, open_itinerary};
use tripplanner::schedule::{Day, Place, ScheduleStore};
use tripplanner::session::{Session, SessionFile};
use tripplanner::sync::{FileBackup, ItinerarySync};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("tripplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Stores loaded from the session file
struct Workspace {
    file: SessionFile,
    chats: ChatStore,
    store: ScheduleStore,
    form: PlanForm,
}

impl Workspace {
    fn open(config: &Config) -> Result<Self> {
        let file = SessionFile::new(config.storage.session_path());
        let session = file.load()?;
        let form = session.form.clone();
        let (chats, store) = session.into_stores(&config.display.colors);
        debug!(chats = chats.chats().len(), days = store.len(), "Workspace::open: loaded");
        Ok(Self {
            file,
            chats,
            store,
            form,
        })
    }

    fn persist(self) -> Result<()> {
        let session = Session {
            form: self.form,
            ..Session::from_stores(self.chats, &self.store)
        };
        self.file.save(&session)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("TripPlanner loaded config: planner={}", config.planner.base_url);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan {
            request,
            region,
            from,
            to,
            travel_type,
            transportation,
            companions,
            pace,
        } => {
            let mut form = PlanForm {
                user_input: request,
                region,
                dates: DateRange::from_iso(&from, &to),
                companions,
                pace,
                ..Default::default()
            };
            if !travel_type.is_empty() {
                form.travel_type = travel_type;
            }
            if let Some(t) = transportation {
                form.transportation = t;
            }
            cmd_plan(&config, form).await
        }
        Command::FollowUp { request, toggle } => cmd_follow_up(&config, request, &toggle).await,
        Command::Show { json, markers } => cmd_show(&config, json, markers),
        Command::Open { chat_id, message_id } => cmd_open(&config, &chat_id, message_id.as_deref()),
        Command::Remove { day, place } => cmd_remove(&config, day, place),
        Command::Move {
            from_day,
            from_place,
            to_day,
            to_place,
        } => {
            let target = match to_place {
                Some(p) => DropTarget::place(to_day, p),
                None => DropTarget::day_end(to_day),
            };
            let events = vec![
                DragEvent::Start(DragSource {
                    day: from_day,
                    place: from_place,
                }),
                DragEvent::Over(target),
                DragEvent::Drop(target),
            ];
            cmd_drag(&config, &events)
        }
        Command::Drag { events } => cmd_drag(&config, &events),
        Command::Add {
            day,
            name,
            address,
            description,
            activity,
            coords,
        } => {
            let mut place = Place::new(name);
            if let Some(a) = address {
                place = place.with_address(a);
            }
            if let Some(d) = description {
                place = place.with_description(d);
            }
            if let Some(a) = activity {
                place = place.with_activity(a);
            }
            if let Some([lat, lon]) = coords.as_deref() {
                place = place.with_coords(*lat, *lon);
            }
            cmd_add(&config, day, place)
        }
        Command::AddDay { label, date } => cmd_add_day(&config, Day::new(label, date, Vec::new())),
        Command::Color { day, color } => cmd_color(&config, day, &color),
        Command::Save => cmd_save(&config),
        Command::Dates {
            today,
            click,
            hover,
            months,
        } => cmd_dates(today.as_deref(), &click, hover.as_deref(), months),
        Command::Chats { select, delete, rename } => {
            cmd_chats(&config, select.as_deref(), delete.as_deref(), rename.as_deref())
        }
        Command::Reset => cmd_reset(&config),
    }
}

async fn cmd_plan(config: &Config, form: PlanForm) -> Result<()> {
    debug!(region = %form.region, "cmd_plan: called");
    let ws = Workspace::open(config)?;
    run_planner(config, ws, form, false).await
}

async fn cmd_follow_up(config: &Config, request: String, toggles: &[String]) -> Result<()> {
    debug!(?toggles, "cmd_follow_up: called");
    let ws = Workspace::open(config)?;
    let mut form = ws.form.clone();
    form.user_input = request;
    for tag in toggles {
        form.toggle_travel_type(tag);
    }
    run_planner(config, ws, form, true).await
}

async fn run_planner(config: &Config, mut ws: Workspace, form: PlanForm, follow_up: bool) -> Result<()> {
    debug!(follow_up, "run_planner: called");
    let client = planner::create_client(&config.planner)?;

    let result = planner::submit(client.as_ref(), &form, follow_up, &mut ws.chats, &mut ws.store).await;
    match result {
        Ok(pending) => {
            ws.form = form;
            let rendered = cli::render_schedule(&ws.store);
            ws.persist()?;
            println!("{} Planned in chat {}", "✓".green(), pending.chat_id.cyan());
            print!("{}", rendered);
            Ok(())
        }
        Err(SubmitError::Form(e)) => bail!("{}", e),
        Err(SubmitError::Planner(e)) => {
            // The failed reply is part of the transcript
            ws.form = form;
            ws.persist()?;
            println!("{} {}", "✗".red(), planner::ERROR_MESSAGE);
            let hint = if e.is_retryable() {
                "The planner may recover; resubmitting can help"
            } else {
                "Resubmitting the same request will fail again"
            };
            println!("  {}", hint.dimmed());
            Err(e).context("Planner request failed")
        }
    }
}

fn cmd_show(config: &Config, json: bool, markers: bool) -> Result<()> {
    debug!(json, markers, "cmd_show: called");
    let ws = Workspace::open(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(ws.store.days())?);
        return Ok(());
    }
    print!("{}", cli::render_schedule(&ws.store));
    if markers {
        print!("{}", cli::render_markers(&ws.store));
    }
    Ok(())
}

fn cmd_open(config: &Config, chat_id: &str, message_id: Option<&str>) -> Result<()> {
    debug!(%chat_id, ?message_id, "cmd_open: called");
    let mut ws = Workspace::open(config)?;
    let message_id = match message_id {
        Some(id) => id.to_string(),
        None => match ws.chats.latest_itinerary_message(chat_id) {
            Some(m) => m.id.clone(),
            None => bail!("Chat {} has no itinerary", chat_id),
        },
    };
    if !open_itinerary(&mut ws.chats, chat_id, &message_id, &mut ws.store) {
        bail!("Message {} in chat {} has no itinerary", message_id, chat_id);
    }
    print!("{}", cli::render_schedule(&ws.store));
    ws.persist()
}

fn cmd_remove(config: &Config, day: usize, place: usize) -> Result<()> {
    debug!(day, place, "cmd_remove: called");
    let mut ws = Workspace::open(config)?;
    if !ws.store.remove_place(day, place) {
        warn!(day, place, "Remove ignored: no such place");
        println!("Nothing removed");
    }
    print!("{}", cli::render_schedule(&ws.store));
    ws.persist()
}

fn cmd_drag(config: &Config, events: &[DragEvent]) -> Result<()> {
    debug!(?events, "cmd_drag: called");
    let mut ws = Workspace::open(config)?;
    let mut controller = DragController::new();
    for event in events {
        let outcome = controller.handle(*event, &mut ws.store);
        debug!(?event, ?outcome, "cmd_drag: event handled");
        match outcome {
            DragOutcome::Moved(_) => println!("{} Moved", "✓".green()),
            DragOutcome::Cancelled => println!("Dropped on itself, nothing moved"),
            DragOutcome::Aborted => println!("Drag aborted"),
            _ => {}
        }
    }
    if controller.is_dragging() {
        // A script that never drops must not leave anything half-done
        controller.reset();
        println!("Drag aborted");
    }
    print!("{}", cli::render_schedule(&ws.store));
    ws.persist()
}

fn cmd_add(config: &Config, day: usize, place: Place) -> Result<()> {
    debug!(day, name = %place.place, "cmd_add: called");
    let mut ws = Workspace::open(config)?;
    if !ws.store.add_place(day, place) {
        bail!("No day {}", day + 1);
    }
    print!("{}", cli::render_schedule(&ws.store));
    ws.persist()
}

fn cmd_add_day(config: &Config, day: Day) -> Result<()> {
    debug!(label = %day.day, "cmd_add_day: called");
    let mut ws = Workspace::open(config)?;
    let index = ws.store.add_day(day);
    println!("{} Added day {}", "✓".green(), index + 1);
    ws.persist()
}

fn cmd_color(config: &Config, day: usize, color: &str) -> Result<()> {
    debug!(day, %color, "cmd_color: called");
    let mut ws = Workspace::open(config)?;
    if !ws.store.set_day_color(color, day) {
        bail!("No color slot for day {}", day + 1);
    }
    print!("{}", cli::render_schedule(&ws.store));
    ws.persist()
}

fn cmd_save(config: &Config) -> Result<()> {
    debug!("cmd_save: called");
    let mut ws = Workspace::open(config)?;
    let sync = ItinerarySync::with_key(FileBackup::new(config.storage.backup_dir()), &config.storage.backup_key);
    let report = sync.save(&ws.store, &mut ws.chats, Utc::now());

    match &report.updated {
        Some(target) => println!(
            "{} Saved to chat {} at {}",
            "✓".green(),
            target.chat_id.cyan(),
            report.saved_label()
        ),
        None => println!("Saved at {} (no chat itinerary to update)", report.saved_label()),
    }
    if !report.backup_written {
        println!("{} Local backup could not be written", "!".yellow());
    }
    ws.persist()
}

fn cmd_dates(today: Option<&str>, clicks: &[String], hover: Option<&str>, months: u32) -> Result<()> {
    debug!(?today, ?clicks, ?hover, months, "cmd_dates: called");
    let today = match today {
        Some(s) => parse_date_arg(s).map_err(|e| eyre::eyre!(e))?,
        None => today_local(),
    };
    let mut picker = DateRangePicker::new(today);
    picker.toggle();
    for _ in 0..months {
        picker.next_month();
    }

    let mut range = DateRange::empty();
    for click in clicks {
        let date = parse_date_arg(click).map_err(|e| eyre::eyre!(e))?;
        range = picker.click(range, date);
    }
    if let Some(h) = hover {
        let date = parse_date_arg(h).map_err(|e| eyre::eyre!(e))?;
        picker.hover(&range, date);
    }

    for panel in picker.panels(&range) {
        println!("{}", cli::render_panel(&panel));
    }
    println!("{}", picker.limit_note().dimmed());
    println!("{}", cli::render_range(&range));
    println!("[{}]", picker.confirm_label(&range));
    Ok(())
}

fn cmd_chats(config: &Config, select: Option<&str>, delete: Option<&str>, rename: Option<&[String]>) -> Result<()> {
    debug!(?select, ?delete, ?rename, "cmd_chats: called");
    let mut ws = Workspace::open(config)?;
    if let Some([id, title]) = rename
        && !ws.chats.rename_chat(id, title.as_str())
    {
        bail!("No chat {}", id);
    }
    if let Some(id) = delete
        && !ws.chats.delete_chat(id)
    {
        bail!("No chat {}", id);
    }
    if let Some(id) = select {
        if ws.chats.chat(id).is_none() {
            bail!("No chat {}", id);
        }
        ws.chats.set_current(Some(id));
    }
    print!("{}", cli::render_chats(&ws.chats));
    println!();
    ws.persist()
}

fn cmd_reset(config: &Config) -> Result<()> {
    debug!("cmd_reset: called");
    let file = SessionFile::new(config.storage.session_path());
    file.clear()?;
    println!("{} Session cleared", "✓".green());
    Ok(())
}
