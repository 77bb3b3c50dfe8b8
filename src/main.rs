mod calc;
mod cmd;
mod data;
mod error;
mod ui;

use calc::{SortDirection, SortKey};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use data::{ExamPatch, ExamRecord};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "examcal", about = "exam timetable, countdown and study-leave planner")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config", global = true)]
    data_dir: PathBuf,

    /// Course to show for this run instead of the saved one
    #[arg(long, global = true)]
    course: Option<String>,

    /// Semester (1-8) to show for this run instead of the saved one
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(1..=8))]
    semester: Option<u8>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config and sample exams
    Init,
    /// List stored exam records with their ids
    Exams {
        /// Only records matching the current course and semester
        #[arg(long)]
        filtered: bool,
    },
    /// Add an exam for the current course and semester
    Add {
        #[arg(long)]
        name: String,
        /// Subject code (e.g. CST301)
        #[arg(long)]
        code: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long)]
        venue: Option<String>,
    },
    /// Edit fields of a stored exam
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        /// New venue; an empty value clears it
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        exam_course: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
        exam_semester: Option<u8>,
    },
    /// Remove one exam by id, or every exam with --all
    Remove {
        #[arg(required_unless_present = "all")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// Show or save the default course and semester
    Filter {
        #[arg(long)]
        set_course: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
        set_semester: Option<u8>,
    },
    /// List exams on or after a date
    Upcoming {
        /// Reference date (YYYY-MM-DD), default today
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Maximum number of exams (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Full timetable in a chosen order
    Table {
        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,
        #[arg(long)]
        desc: bool,
    },
    /// Month grid with exam codes
    Calendar {
        /// Month to show (YYYY-MM), default this month
        #[arg(long)]
        month: Option<String>,
        /// Pick study-leave dates on the grid (give one or two)
        #[arg(long)]
        leave: Vec<NaiveDate>,
    },
    /// Study leave between picked dates
    Leave {
        #[arg(required = true)]
        dates: Vec<NaiveDate>,
    },
    /// Time left until the next exam
    Countdown {
        /// Keep printing the countdown until the exam starts
        #[arg(long)]
        watch: bool,
        /// Seconds between updates when watching
        #[arg(long, default_value_t = 60)]
        interval: u64,
        /// Stop watching after this many updates
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose, std::env::var("EXAMCAL_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let ctx = || cmd::Context::load(cli.course.as_deref(), cli.semester);

    match cli.command {
        None => cmd::root::run(&ctx()?),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Exams { filtered }) => {
            let filter = if filtered { Some(ctx()?.filter) } else { None };
            cmd::exams::run(filter.as_ref())
        }
        Some(Commands::Add {
            name,
            code,
            date,
            time,
            venue,
        }) => {
            let filter = ctx()?.filter;
            let mut record = ExamRecord::new(&name, &code, &date, &time, filter.semester, &filter.course);
            record.venue = venue;
            cmd::admin::run_add(record)
        }
        Some(Commands::Update {
            id,
            name,
            code,
            date,
            time,
            venue,
            exam_course,
            exam_semester,
        }) => cmd::admin::run_update(
            &id,
            ExamPatch {
                name,
                subject_code: code,
                date,
                time,
                venue,
                semester: exam_semester,
                course: exam_course,
            },
        ),
        Some(Commands::Remove { id, all }) => match id {
            Some(id) if !all => cmd::admin::run_remove(&id),
            _ => cmd::admin::run_remove_all(),
        },
        Some(Commands::Filter {
            set_course,
            set_semester,
        }) => cmd::filter::run(set_course.as_deref(), set_semester),
        Some(Commands::Upcoming { from, limit }) => cmd::upcoming::run(&ctx()?, from, limit),
        Some(Commands::Table { sort, desc }) => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            cmd::table::run(&ctx()?, sort, direction)
        }
        Some(Commands::Calendar { month, leave }) => {
            cmd::calendar::run(&ctx()?, month.as_deref(), &leave)
        }
        Some(Commands::Leave { dates }) => cmd::leave::run(&ctx()?, &dates),
        Some(Commands::Countdown {
            watch,
            interval,
            ticks,
        }) => cmd::countdown::run(&ctx()?, watch, interval, ticks),
    }
}

/// `-v` flags win over `EXAMCAL_LOG`; without either only warnings show.
fn log_level(verbose: u8, env: Option<&str>) -> Level {
    match verbose {
        0 => env.and_then(|s| s.parse().ok()).unwrap_or(Level::WARN),
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_needs_init_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does_not_exist");
        assert!(dir_needs_init(&missing));
    }

    #[test]
    fn test_dir_needs_init_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_dir_needs_init_nonempty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("exams.json"), "{}").unwrap();
        assert!(!dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0, None), Level::WARN);
        assert_eq!(log_level(0, Some("debug")), Level::DEBUG);
        assert_eq!(log_level(0, Some("chatty")), Level::WARN);
        assert_eq!(log_level(1, Some("error")), Level::INFO);
        assert_eq!(log_level(3, None), Level::DEBUG);
    }

    #[test]
    fn test_cli_parses_global_filter_after_subcommand() {
        let cli = Cli::try_parse_from(["examcal", "table", "--sort", "subject-code", "--semester", "5"]).unwrap();
        assert_eq!(cli.semester, Some(5));
        assert!(matches!(
            cli.command,
            Some(Commands::Table {
                sort: SortKey::SubjectCode,
                desc: false
            })
        ));
    }

    #[test]
    fn test_cli_rejects_semester_out_of_range() {
        assert!(Cli::try_parse_from(["examcal", "--semester", "9"]).is_err());
        assert!(Cli::try_parse_from(["examcal", "--semester", "0"]).is_err());
    }

    #[test]
    fn test_cli_leave_needs_dates() {
        assert!(Cli::try_parse_from(["examcal", "leave"]).is_err());
        let cli = Cli::try_parse_from(["examcal", "leave", "2025-04-15", "2025-04-17"]).unwrap();
        match cli.command {
            Some(Commands::Leave { dates }) => assert_eq!(dates.len(), 2),
            _ => panic!("expected leave"),
        }
    }

    #[test]
    fn test_cli_remove_needs_id_or_all() {
        assert!(Cli::try_parse_from(["examcal", "remove"]).is_err());
        assert!(Cli::try_parse_from(["examcal", "remove", "--all"]).is_ok());
        assert!(Cli::try_parse_from(["examcal", "remove", "abc", "--all"]).is_err());
    }
}
