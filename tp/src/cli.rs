//! CLI command definitions, argument parsers and text rendering

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use crate::calendar::{CalendarCell, DateRange, MonthPanel, PanelNav, WEEKDAYS, format_range, parse_date};
use crate::chat::{ChatStore, Role};
use crate::drag::{DragEvent, DragSource, DropTarget};
use crate::planner::TRAVEL_TYPE_OPTIONS;
use crate::schedule::ScheduleStore;

/// TripPlanner - AI travel itinerary editor
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Plan a trip with an AI planner and edit the itinerary",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
///
/// Day and place positions are 1-based, as shown by `show`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a new chat and ask the planner for an itinerary
    Plan {
        /// Free-form trip request
        request: String,

        /// Destination region
        #[arg(short, long)]
        region: String,

        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Travel type tag; repeat for several
        #[arg(short = 't', long = "travel-type", value_parser = PossibleValuesParser::new(TRAVEL_TYPE_OPTIONS))]
        travel_type: Vec<String>,

        /// Transportation
        #[arg(long)]
        transportation: Option<String>,

        /// Travel companions
        #[arg(long, default_value = "")]
        companions: String,

        /// Trip pace
        #[arg(long, default_value = "")]
        pace: String,
    },

    /// Continue the current chat with another request
    ///
    /// Region, dates and preferences carry over from the last plan.
    FollowUp {
        /// Follow-up request
        request: String,

        /// Toggle a travel type tag on the carried-over preferences; repeat for several
        #[arg(short = 't', long = "travel-type", value_parser = PossibleValuesParser::new(TRAVEL_TYPE_OPTIONS))]
        toggle: Vec<String>,
    },

    /// Show the current schedule
    Show {
        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,

        /// Also list map markers
        #[arg(long)]
        markers: bool,
    },

    /// Load the itinerary of a chat message into the schedule
    Open {
        /// Chat id
        chat_id: String,

        /// Message id; defaults to the chat's latest itinerary
        message_id: Option<String>,
    },

    /// Remove a place
    Remove {
        #[arg(value_parser = parse_position)]
        day: usize,

        #[arg(value_parser = parse_position)]
        place: usize,
    },

    /// Move a place (a drag from source to target)
    Move {
        #[arg(value_parser = parse_position)]
        from_day: usize,

        #[arg(value_parser = parse_position)]
        from_place: usize,

        #[arg(value_parser = parse_position)]
        to_day: usize,

        /// Insert before this place; omit to append to the day
        #[arg(value_parser = parse_position)]
        to_place: Option<usize>,
    },

    /// Replay a scripted drag gesture
    ///
    /// Events: start:DAY:PLACE, over:DAY:PLACE, over:DAY:end,
    /// drop:DAY:PLACE, drop:DAY:end, end
    Drag {
        #[arg(required = true, value_parser = parse_drag_event)]
        events: Vec<DragEvent>,
    },

    /// Append a place to a day
    Add {
        #[arg(value_parser = parse_position)]
        day: usize,

        /// Place name
        name: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        activity: Option<String>,

        /// Latitude and longitude
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        coords: Option<Vec<f64>>,
    },

    /// Append an empty day
    AddDay {
        /// Day label, e.g. 3일차
        label: String,

        /// Date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        date: String,
    },

    /// Set a day's color
    Color {
        #[arg(value_parser = parse_position)]
        day: usize,

        /// Hex color, e.g. #156bf0
        color: String,
    },

    /// Save the edited schedule back into the chat
    Save,

    /// Script the date range picker
    Dates {
        /// Date treated as today (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<String>,

        /// Day clicks, in order
        #[arg(long)]
        click: Vec<String>,

        /// Hovered day, for the preview end
        #[arg(long)]
        hover: Option<String>,

        /// Months to advance the view
        #[arg(long, default_value = "0")]
        months: u32,
    },

    /// List chats, or manage them
    Chats {
        /// Make this chat current
        #[arg(long, conflicts_with = "delete")]
        select: Option<String>,

        /// Delete this chat
        #[arg(long)]
        delete: Option<String>,

        /// Retitle a chat
        #[arg(long, num_args = 2, value_names = ["ID", "TITLE"])]
        rename: Option<Vec<String>>,
    },

    /// Discard all chats and the schedule
    Reset,
}

/// Parse a 1-based position into a 0-based index
pub fn parse_position(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a position", s))?;
    n.checked_sub(1).ok_or_else(|| "positions start at 1".to_string())
}

/// Parse one scripted drag event
pub fn parse_drag_event(s: &str) -> Result<DragEvent, String> {
    debug!(%s, "parse_drag_event: called");
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        ["end"] => Ok(DragEvent::End),
        ["start", day, place] => Ok(DragEvent::Start(DragSource {
            day: parse_position(day)?,
            place: parse_position(place)?,
        })),
        ["over", day, place] => Ok(DragEvent::Over(parse_target(day, place)?)),
        ["drop", day, place] => Ok(DragEvent::Drop(parse_target(day, place)?)),
        _ => Err(format!("unknown drag event '{}'", s)),
    }
}

fn parse_target(day: &str, place: &str) -> Result<DropTarget, String> {
    let day = parse_position(day)?;
    if place == "end" {
        Ok(DropTarget::day_end(day))
    } else {
        Ok(DropTarget::place(day, parse_position(place)?))
    }
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date_arg(s: &str) -> Result<chrono::NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{}' is not a YYYY-MM-DD date", s))
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn paint(text: &str, color: &str) -> String {
    match hex_rgb(color) {
        Some((r, g, b)) => text.truecolor(r, g, b).bold().to_string(),
        None => text.bold().to_string(),
    }
}

/// Day-by-day listing of the schedule
pub fn render_schedule(store: &ScheduleStore) -> String {
    debug!(days = store.len(), "render_schedule: called");
    if store.is_empty() {
        return "No schedule yet".to_string();
    }
    let mut out = String::new();
    for (i, day) in store.days().iter().enumerate() {
        let header = format!("Day {} {} {}", i + 1, day.day, day.date);
        out.push_str(&paint(header.trim_end(), store.color_for_day(i)));
        out.push('\n');
        if day.plan.is_empty() {
            out.push_str(&format!("  {}\n", "(empty)".dimmed()));
        }
        for place in &day.plan {
            out.push_str(&format!("  {}. {}", place.order, place.place));
            if !place.activity.is_empty() {
                out.push_str(&format!(" - {}", place.activity));
            }
            if !place.address.is_empty() {
                out.push_str(&format!(" {}", format!("({})", place.address).dimmed()));
            }
            out.push('\n');
        }
    }
    out
}

/// Map markers, one per line
pub fn render_markers(store: &ScheduleStore) -> String {
    store
        .markers()
        .iter()
        .map(|m| {
            format!(
                "{} {} {:.5},{:.5} {}\n",
                m.day_key,
                m.order,
                m.latitude,
                m.longitude,
                paint(&m.name, &m.color)
            )
        })
        .collect()
}

/// Chat list with the current chat marked
pub fn render_chats(chats: &ChatStore) -> String {
    if chats.chats().is_empty() {
        return "No chats".to_string();
    }
    let current = chats.current_chat_id();
    chats
        .chats()
        .iter()
        .map(|chat| {
            let marker = if Some(chat.id.as_str()) == current { "*" } else { " " };
            let itinerary = chat
                .latest_itinerary()
                .map(|m| format!(" [{}]", m.id))
                .unwrap_or_default();
            let replies = chat.messages.iter().filter(|m| m.role == Role::Assistant).count();
            format!(
                "{} {} {} ({} replies){}\n",
                marker,
                chat.id.cyan(),
                chat.title,
                replies,
                itinerary.dimmed()
            )
        })
        .collect()
}

fn render_cell(cell: &CalendarCell) -> String {
    let Some(date) = cell.date else {
        return "   ".to_string();
    };
    let text = format!("{:>3}", chrono::Datelike::day(&date));
    if cell.is_start || cell.is_end {
        text.reversed().bold().to_string()
    } else if cell.in_range {
        text.underline().to_string()
    } else if !cell.is_selectable() {
        text.dimmed().to_string()
    } else if cell.is_sunday {
        text.red().to_string()
    } else if cell.is_saturday {
        text.blue().to_string()
    } else {
        text
    }
}

/// One month grid, Sunday first
pub fn render_panel(panel: &MonthPanel) -> String {
    let nav = match panel.nav {
        PanelNav::Prev { enabled: true } => "<",
        PanelNav::Prev { enabled: false } => " ",
        PanelNav::Next => ">",
    };
    let mut out = format!("{} {}\n", nav, panel.label.bold());
    for name in WEEKDAYS {
        out.push_str(&format!("{:>2}", name));
    }
    out.push('\n');
    for week in panel.cells.chunks(7) {
        let line: String = week.iter().map(render_cell).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Range line under the calendar
pub fn render_range(range: &DateRange) -> String {
    let text = format_range(range);
    if text.is_empty() { "-".to_string() } else { text }
}
