use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::logging;
use crate::model::{ConnectionType, Favourite};

const FAVOURITES_RELATIVE_PATH: &str = "Library/Application Support/ForkLift/Favorites/Favorites.json";

#[derive(Debug)]
pub enum LoadError {
    NotFound(PathBuf),
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "favourites file does not exist: {}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "error unmarshalling {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub ignore_local: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FavouritesFile {
    #[serde(rename = "favorites")]
    groups: Vec<FavouriteGroup>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FavouriteGroup {
    attributes: Attributes,
    #[serde(rename = "childItems")]
    children: Vec<FavouriteChild>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FavouriteChild {
    #[serde(rename = "UUID")]
    uuid: String,
    attributes: Attributes,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "PascalCase")]
struct Attributes {
    name: String,
    path: String,
    server: String,
}

/// Where ForkLift keeps its favourites for the current user.
pub fn default_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"));
    home.join(FAVOURITES_RELATIVE_PATH)
}

/// Reads and flattens the favourites file at `path`, sorted by name.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Vec<Favourite>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&raw, options).map_err(|error| LoadError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

fn parse(raw: &str, options: &LoadOptions) -> Result<Vec<Favourite>, serde_json::Error> {
    let file: FavouritesFile = serde_json::from_str(raw)?;
    logging::info(&format!("{:2} group(s)", file.groups.len()));

    let mut favourites = Vec::new();
    for group in file.groups {
        logging::info(&format!(
            "{:2} favourite(s) in group {:?}",
            group.children.len(),
            group.attributes.name
        ));

        for child in group.children {
            let connection_type = ConnectionType::parse(&child.kind);
            if !keep(&connection_type, &child.attributes.path, options) {
                continue;
            }

            let favourite = Favourite::from_owned(
                child.uuid,
                child.attributes.name,
                group.attributes.name.clone(),
                child.attributes.path,
                child.attributes.server,
                connection_type,
            );
            if favourite.name.is_empty() {
                logging::warn(&format!("favourite {} has no name", favourite.id));
            }
            favourites.push(favourite);
        }
    }

    favourites.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(favourites)
}

fn keep(connection_type: &ConnectionType, path: &str, options: &LoadOptions) -> bool {
    if !connection_type.is_local() {
        return true;
    }
    if options.ignore_local {
        return false;
    }
    if path.is_empty() || !Path::new(path).exists() {
        logging::info(&format!("skipping local favourite with missing path {path:?}"));
        return false;
    }
    true
}
