use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::logging;

const STATE_FILE_NAME: &str = "update.json";
const PID_FILE_NAME: &str = "update.pid";
const WORKFLOW_EXTENSION: &str = ".alfredworkflow";
const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub enum UpdateError {
    Http(reqwest::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    NoRelease(String),
    NoDownload,
}

impl Display for UpdateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(error) => write!(f, "http error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Json(error) => write!(f, "json error: {error}"),
            Self::NoRelease(repo) => write!(f, "no usable release found for {repo}"),
            Self::NoDownload => write!(f, "no update has been downloaded yet; run --update first"),
        }
    }
}

impl std::error::Error for UpdateError {}

impl From<reqwest::Error> for UpdateError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<std::io::Error> for UpdateError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for UpdateError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// A release version such as `v1.2.3` or `2.0-beta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl Version {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let (core, pre) = match trimmed.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, Some(pre.to_string())),
            Some(_) => return None,
            None => (trimmed, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return None;
        }
        let mut numbers = [0_u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().ok()?;
        }

        Some(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            pre,
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateState {
    pub last_check_epoch_secs: u64,
    pub latest_version: Option<String>,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn state_path(cfg: &Config) -> PathBuf {
    cfg.cache_dir.join(STATE_FILE_NAME)
}

/// Reads the cached update state. A missing or unreadable cache counts as
/// "never checked".
pub fn load_state(cfg: &Config) -> UpdateState {
    let path = state_path(cfg);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(_) => return UpdateState::default(),
    };
    serde_json::from_str(&raw).unwrap_or_else(|error| {
        logging::warn(&format!("discarding update cache {}: {error}", path.display()));
        UpdateState::default()
    })
}

pub fn save_state(cfg: &Config, state: &UpdateState) -> Result<(), UpdateError> {
    std::fs::create_dir_all(&cfg.cache_dir)?;
    let encoded = serde_json::to_string_pretty(state)?;
    std::fs::write(state_path(cfg), encoded)?;
    Ok(())
}

pub fn check_due(state: &UpdateState, interval_secs: u64, now: u64) -> bool {
    state.last_check_epoch_secs == 0
        || now.saturating_sub(state.last_check_epoch_secs) >= interval_secs
}

pub fn update_available(state: &UpdateState, current_version: &str) -> bool {
    let Some(latest) = state.latest_version.as_deref().and_then(Version::parse) else {
        return false;
    };
    match Version::parse(current_version) {
        Some(current) => latest > current,
        None => {
            logging::warn(&format!("invalid workflow version {current_version:?}"));
            false
        }
    }
}

/// Picks the newest published release carrying a workflow package.
pub fn select_release(releases: &[Release]) -> Option<(Version, &ReleaseAsset)> {
    releases
        .iter()
        .filter(|release| !release.draft && !release.prerelease)
        .filter_map(|release| {
            let version = Version::parse(&release.tag_name)?;
            let asset = release
                .assets
                .iter()
                .find(|asset| asset.name.ends_with(WORKFLOW_EXTENSION))?;
            Some((version, asset))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
}

/// Asks GitHub for the latest release and records the result in the cache.
/// The check time is recorded before fetching, so a failed check still waits
/// out the interval before the next attempt.
pub fn check_for_update(cfg: &Config) -> Result<UpdateState, UpdateError> {
    let url = format!("https://api.github.com/repos/{}/releases", cfg.update_repo);
    check_for_update_at(cfg, &url)
}

fn check_for_update_at(cfg: &Config, url: &str) -> Result<UpdateState, UpdateError> {
    let mut state = load_state(cfg);
    state.last_check_epoch_secs = now_secs();
    save_state(cfg, &state)?;

    logging::info(&format!("fetching {url}"));
    let releases: Vec<Release> = http_client(cfg)?
        .get(url)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .send()?
        .error_for_status()?
        .json()?;

    let (version, asset) =
        select_release(&releases).ok_or_else(|| UpdateError::NoRelease(cfg.update_repo.clone()))?;
    state.latest_version = Some(version.to_string());
    state.download_url = Some(asset.browser_download_url.clone());
    save_state(cfg, &state)?;
    Ok(state)
}

/// Downloads the recorded release into the cache and opens it so the host
/// installs it.
pub fn install_update(cfg: &Config) -> Result<PathBuf, UpdateError> {
    let state = load_state(cfg);
    let url = state.download_url.ok_or(UpdateError::NoDownload)?;
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|name| name.ends_with(WORKFLOW_EXTENSION))
        .unwrap_or("update.alfredworkflow")
        .to_string();

    logging::info(&format!("downloading {url}"));
    let bytes = http_client(cfg)?.get(&url).send()?.error_for_status()?.bytes()?;
    std::fs::create_dir_all(&cfg.cache_dir)?;
    let target = cfg.cache_dir.join(file_name);
    std::fs::write(&target, &bytes)?;

    let status = Command::new("open").arg(&target).status()?;
    if !status.success() {
        return Err(UpdateError::Io(std::io::Error::other(format!(
            "open exited with {status}"
        ))));
    }
    Ok(target)
}

/// Starts `<self> --update` detached unless a check is already running.
/// Returns whether a new check was started.
pub fn run_in_background(cfg: &Config) -> Result<bool, UpdateError> {
    if is_running(cfg) {
        return Ok(false);
    }

    // Reserve the slot before spawning so concurrent invocations back off.
    claim_running(cfg)?;
    let spawned = std::env::current_exe().and_then(|exe| {
        Command::new(exe)
            .arg("--update")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    });
    let child = match spawned {
        Ok(child) => child,
        Err(error) => {
            clear_running(cfg);
            return Err(error.into());
        }
    };

    // The child claims the file itself on start; only hand it over if it
    // has not done so yet.
    let path = pid_path(cfg);
    if read_pid(&path) == Some(std::process::id()) {
        std::fs::write(&path, child.id().to_string())?;
    }
    logging::info(&format!("started background update check pid={}", child.id()));
    Ok(true)
}

pub fn is_running(cfg: &Config) -> bool {
    let path = pid_path(cfg);
    let Some(pid) = read_pid(&path) else {
        return false;
    };
    let alive = Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if !alive {
        let _ = std::fs::remove_file(&path);
    }
    alive
}

/// Records the current process as the running update check.
pub fn claim_running(cfg: &Config) -> Result<(), UpdateError> {
    std::fs::create_dir_all(&cfg.cache_dir)?;
    std::fs::write(pid_path(cfg), std::process::id().to_string())?;
    Ok(())
}

/// Removes the pid file, but only while it still names this process.
pub fn clear_running(cfg: &Config) {
    let path = pid_path(cfg);
    if read_pid(&path) == Some(std::process::id()) {
        let _ = std::fs::remove_file(&path);
    }
}

fn pid_path(cfg: &Config) -> PathBuf {
    cfg.cache_dir.join(PID_FILE_NAME)
}

fn read_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn http_client(cfg: &Config) -> Result<reqwest::blocking::Client, UpdateError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(format!("{}/{}", cfg.name, cfg.version))
        .build()?;
    Ok(client)
}
