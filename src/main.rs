mod app;
mod clock;
mod prompt;

use anyhow::Result;
use anyhow::bail;
use app::App;
use app::SettingsUpdate;
use clock::Clock;
use clock::LocalClock;
use pico_args::Arguments;
use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vocab_srs::Store;
use vocab_srs::corpus::load_corpus;

const HELP: &str = "\
Usage: vocab-srs <command> [--db PATH] [--corpus PATH]

Commands:
  init           Create the database
  review         Study today's session
  stats          Show progress and activity
  achievements   List achievements
  settings       Show or change settings
                   [--daily-goal N] [--session-size N]
                   [--new-words-ratio N] [--reminders on|off]

Options:
  --db PATH       Database file [default: vocab.db]
  --corpus PATH   Word list [default: words.json]
";

enum Command {
    Init,
    Review,
    Stats,
    Achievements,
    Settings(SettingsUpdate),
}

struct Args {
    db: PathBuf,
    corpus: PathBuf,
    command: Command,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let Some(args) = parse_args()? else {
        print!("{HELP}");
        return Ok(());
    };

    let clock = LocalClock;
    let store = Store::open(&args.db)?;
    let mut app = App::new(store, clock);

    if !matches!(args.command, Command::Init) {
        app.activate()?;
    }

    match args.command {
        Command::Init => app.init(&load_corpus(&args.corpus, LocalClock.now())?),
        Command::Review => app.review(load_corpus(&args.corpus, LocalClock.now())?),
        Command::Stats => app.stats(load_corpus(&args.corpus, LocalClock.now())?),
        Command::Achievements => app.achievements(),
        Command::Settings(update) => app.settings(update),
    }
}

fn parse_args() -> Result<Option<Args>> {
    let mut pargs = Arguments::from_env();

    let subcommand = pargs.subcommand()?;
    if pargs.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let db = pargs
        .opt_value_from_os_str("--db", parse_path)?
        .unwrap_or_else(|| PathBuf::from("vocab.db"));
    let corpus = pargs
        .opt_value_from_os_str("--corpus", parse_path)?
        .unwrap_or_else(|| PathBuf::from("words.json"));

    let command = match subcommand.as_deref() {
        Some("init") => Command::Init,
        Some("review") => Command::Review,
        Some("stats") => Command::Stats,
        Some("achievements") => Command::Achievements,
        Some("settings") => Command::Settings(SettingsUpdate {
            daily_goal: pargs.opt_value_from_str("--daily-goal")?,
            session_size: pargs.opt_value_from_str("--session-size")?,
            new_words_ratio: pargs.opt_value_from_str("--new-words-ratio")?,
            reminders_enabled: pargs.opt_value_from_fn("--reminders", parse_switch)?,
        }),
        Some(other) => bail!("Unknown command '{other}'"),
        None => return Ok(None),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("Unexpected arguments: {remaining:?}");
    }

    Ok(Some(Args {
        db,
        corpus,
        command,
    }))
}

fn parse_path(s: &OsStr) -> Result<PathBuf, &'static str> {
    Ok(s.into())
}

fn parse_switch(s: &str) -> Result<bool, &'static str> {
    match s {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err("expected 'on' or 'off'"),
    }
}
