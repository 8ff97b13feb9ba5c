use std::io::Write;

use crate::config::{self, Config, ConfigError};
use crate::favourites::{self, LoadError, LoadOptions};
use crate::feedback::{Feedback, Icon, Item};
use crate::update::{self, UpdateError};
use crate::{demo, icons, logging, search};

pub const UPDATE_QUERY: &str = "workflow:update";

const USAGE: &str = "forklift [options] [<query>]

Filter ForkLift favourites in Alfred.

Usage:
    forklift [--demo] [<query>]
    forklift --logfile
    forklift --distname
    forklift --update
    forklift -h | --help | --version

Options:
    --demo        Use demo data instead of real favourites.
    --distname    Print filename of distributable .alfredworkflow file.
    -h, --help    Show this message and exit.
    --logfile     Print path to workflow's log file and exit.
    --update      Check whether an update is available.
    --version     Print version and exit.
";

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Load(LoadError),
    Update(UpdateError),
    Output(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Load(error) => write!(f, "couldn't load favourites: {error}"),
            Self::Update(error) => write!(f, "update error: {error}"),
            Self::Output(error) => write!(f, "output error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoadError> for RuntimeError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<UpdateError> for RuntimeError {
    fn from(value: UpdateError) -> Self {
        Self::Update(value)
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value.to_string())
    }
}

impl From<serde_json::Error> for RuntimeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Help,
    Version,
    LogFile,
    DistName,
    Update,
    ScriptFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub mode: Mode,
    pub demo: bool,
    pub query: String,
}

/// Parses the command line. When several mode flags are given, the first in
/// help, version, logfile, distname, update order wins.
pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut help = false;
    let mut version = false;
    let mut logfile = false;
    let mut distname = false;
    let mut update = false;
    let mut demo = false;
    let mut positionals: Vec<&str> = Vec::new();
    let mut only_positionals = false;

    for arg in args {
        if only_positionals || !arg.starts_with('-') || arg == "-" {
            positionals.push(arg);
            continue;
        }
        match arg.as_str() {
            "--" => only_positionals = true,
            "-h" | "--help" => help = true,
            "--version" => version = true,
            "--logfile" => logfile = true,
            "--distname" => distname = true,
            "-u" | "--update" | "-update" => update = true,
            "--demo" | "-demo" => demo = true,
            other => return Err(format!("unknown option '{other}'\n\n{USAGE}")),
        }
    }

    let mode = if help {
        Mode::Help
    } else if version {
        Mode::Version
    } else if logfile {
        Mode::LogFile
    } else if distname {
        Mode::DistName
    } else if update {
        Mode::Update
    } else {
        Mode::ScriptFilter
    };

    Ok(CliOptions {
        mode,
        demo,
        query: positionals.join(" "),
    })
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let cfg = config::load()?;
    if let Err(error) = logging::init(&cfg) {
        eprintln!("[forklift] logging disabled: {error}");
    }
    logging::info(&format!("args={options:?}"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = execute(&options, &cfg, &mut out);
    if let Err(error) = &result {
        logging::error(&error.to_string());
    }
    result
}

pub fn execute<W: Write>(options: &CliOptions, cfg: &Config, out: &mut W) -> Result<(), RuntimeError> {
    match options.mode {
        Mode::Help => write!(out, "{USAGE}")?,
        Mode::Version => writeln!(out, "{}/{}", cfg.name, cfg.version)?,
        Mode::LogFile => writeln!(out, "{}", logging::log_file_path(cfg).display())?,
        Mode::DistName => writeln!(out, "{}", dist_name(cfg))?,
        Mode::Update => {
            logging::info("checking for update...");
            if let Err(error) = update::claim_running(cfg) {
                logging::warn(&format!("could not record update pid: {error}"));
            }
            let result = update::check_for_update(cfg);
            update::clear_running(cfg);
            let state = result?;
            if update::update_available(&state, &cfg.version) {
                let latest = state.latest_version.unwrap_or_default();
                writeln!(out, "update available: {latest}")?;
            } else {
                writeln!(out, "workflow is up to date ({})", cfg.version)?;
            }
        }
        Mode::ScriptFilter => {
            let feedback = if options.query.trim() == UPDATE_QUERY {
                install_feedback(cfg)
            } else {
                script_filter(cfg, &options.query, options.demo)?
            };
            writeln!(out, "{}", feedback.to_json()?)?;
        }
    }
    Ok(())
}

/// Name of the distributable package, e.g. `ForkLift-2.0.0.alfredworkflow`.
pub fn dist_name(cfg: &Config) -> String {
    format!("{}-{}.alfredworkflow", cfg.name, cfg.version).replace(' ', "-")
}

/// Loads favourites (or demo data), filters them by `query` and builds the
/// feedback sent back to the host.
pub fn script_filter(cfg: &Config, query: &str, demo_mode: bool) -> Result<Feedback, RuntimeError> {
    logging::info(&format!("query={query:?}"));
    let mut feedback = Feedback::new();

    let state = update::load_state(cfg);
    if !demo_mode && update::check_due(&state, cfg.update_interval_secs, update::now_secs()) {
        logging::info("update check due");
        if let Err(error) = update::run_in_background(cfg) {
            logging::error(&format!("update check failed: {error}"));
        }
    }

    if query.trim().is_empty() && update::update_available(&state, &cfg.version) {
        logging::info("update available");
        feedback.push(Item {
            title: "An update is available".to_string(),
            subtitle: "↩ or ⇥ to install update".to_string(),
            valid: false,
            autocomplete: Some(UPDATE_QUERY.to_string()),
            icon: Some(Icon::image(icons::UPDATE_ICON)),
            ..Default::default()
        });
        feedback.suppress_uids();
    }

    let favourites = if demo_mode {
        demo::demo_favourites()
    } else {
        let options = LoadOptions {
            ignore_local: cfg.ignore_local,
        };
        favourites::load(&cfg.favourites_path, &options)?
    };
    logging::info(&format!("{} favourite(s)", favourites.len()));

    let results = search::filter(&favourites, query);
    if !query.trim().is_empty() {
        logging::info(&format!("{} favourite(s) match {query:?}", results.len()));
    }
    for result in results {
        let favourite = result.favourite;
        logging::info(&format!("{} ({})", favourite.name, favourite.connection_type));
        feedback.push_favourite(favourite);
    }

    feedback.warn_empty("No favourites found", "Try a different query?");
    Ok(feedback)
}

fn install_feedback(cfg: &Config) -> Feedback {
    let mut feedback = Feedback::new();
    let item = match update::install_update(cfg) {
        Ok(path) => Item {
            title: "Installing update…".to_string(),
            subtitle: path.display().to_string(),
            valid: false,
            icon: Some(Icon::image(icons::UPDATE_ICON)),
            ..Default::default()
        },
        Err(error) => {
            logging::error(&format!("update install failed: {error}"));
            Item {
                title: "Update failed".to_string(),
                subtitle: error.to_string(),
                valid: false,
                icon: Some(Icon::image(icons::DEFAULT_ICON)),
                ..Default::default()
            }
        }
    };
    feedback.push(item);
    feedback
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_args, Mode};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn defaults_to_script_filter_with_query() {
        let options = parse_cli_args(&args(&["warez"])).unwrap();
        assert_eq!(options.mode, Mode::ScriptFilter);
        assert_eq!(options.query, "warez");
        assert!(!options.demo);
    }

    #[test]
    fn joins_extra_positionals_into_query() {
        let options = parse_cli_args(&args(&["--demo", "server", "logs"])).unwrap();
        assert!(options.demo);
        assert_eq!(options.query, "server logs");
    }

    #[test]
    fn first_mode_in_precedence_order_wins() {
        let options = parse_cli_args(&args(&["--update", "--distname", "--logfile"])).unwrap();
        assert_eq!(options.mode, Mode::LogFile);

        let options = parse_cli_args(&args(&["--update", "--distname"])).unwrap();
        assert_eq!(options.mode, Mode::DistName);

        let options = parse_cli_args(&args(&["--version", "-h"])).unwrap();
        assert_eq!(options.mode, Mode::Help);
    }

    #[test]
    fn rejects_unknown_flags_and_allows_dash_queries() {
        assert!(parse_cli_args(&args(&["--bogus"])).is_err());

        let options = parse_cli_args(&args(&["--", "-v"])).unwrap();
        assert_eq!(options.query, "-v");
    }
}
