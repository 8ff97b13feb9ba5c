use std::fmt::{Display, Formatter};

const CLOUD_PROVIDERS: [&str; 6] = [
    "Backblaze",
    "Box",
    "Dropbox",
    "GoogleDrive",
    "OneDrive",
    "Rackspace",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    Local,
    Sftp,
    Ftp,
    Nfs,
    S3,
    WebDav,
    WebDavSecure,
    Sync,
    Search,
    Vnc,
    Workspace,
    CloudProvider(String),
    Unknown(String),
}

impl ConnectionType {
    /// Maps ForkLift's `type` tag onto a connection type. Unrecognized tags
    /// are kept verbatim in `Unknown`.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        match tag {
            "Local" => Self::Local,
            "SFTP" => Self::Sftp,
            "FTP" => Self::Ftp,
            "NFS" => Self::Nfs,
            "S3" => Self::S3,
            "WebDAV" => Self::WebDav,
            "WebDAVHTTPS" => Self::WebDavSecure,
            "Sync" => Self::Sync,
            "Search" => Self::Search,
            "VNC" => Self::Vnc,
            "Workspace" => Self::Workspace,
            _ if CLOUD_PROVIDERS.contains(&tag) => Self::CloudProvider(tag.to_string()),
            _ => Self::Unknown(tag.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::Local => "Local",
            Self::Sftp => "SFTP",
            Self::Ftp => "FTP",
            Self::Nfs => "NFS",
            Self::S3 => "S3",
            Self::WebDav => "WebDAV",
            Self::WebDavSecure => "WebDAVHTTPS",
            Self::Sync => "Sync",
            Self::Search => "Search",
            Self::Vnc => "VNC",
            Self::Workspace => "Workspace",
            Self::CloudProvider(name) | Self::Unknown(name) => name.as_str(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl Display for ConnectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A single ForkLift favourite, flattened out of its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favourite {
    pub id: String,
    pub name: String,
    pub group: String,
    pub path: String,
    pub server: String,
    pub connection_type: ConnectionType,
    normalized_name: String,
    normalized_key: String,
}

impl Favourite {
    pub fn new(
        id: &str,
        name: &str,
        group: &str,
        path: &str,
        server: &str,
        connection_type: ConnectionType,
    ) -> Self {
        Self::from_owned(
            id.to_string(),
            name.to_string(),
            group.to_string(),
            path.to_string(),
            server.to_string(),
            connection_type,
        )
    }

    /// Builds a favourite, deriving an empty name from the last component
    /// of `path`.
    pub fn from_owned(
        id: String,
        name: String,
        group: String,
        path: String,
        server: String,
        connection_type: ConnectionType,
    ) -> Self {
        let name = if name.is_empty() && !path.is_empty() {
            name_from_path(&path)
        } else {
            name
        };
        let normalized_name = normalize_for_search(&name);
        let normalized_key = normalize_for_search(&format!("{name} {server}"));
        Self {
            id,
            name,
            group,
            path,
            server,
            connection_type,
            normalized_name,
            normalized_key,
        }
    }

    /// The text queries are matched against: name and server, space-joined.
    pub fn search_key(&self) -> String {
        format!("{} {}", self.name, self.server)
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn normalized_key(&self) -> &str {
        &self.normalized_key
    }
}

fn name_from_path(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

pub fn normalize_for_search(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
