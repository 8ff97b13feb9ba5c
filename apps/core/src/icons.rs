use crate::feedback::Icon;
use crate::logging;
use crate::model::{ConnectionType, Favourite};

/// ForkLift's bundled resources, where the connection icons live.
pub const FORKLIFT_RESOURCES: &str = "/Applications/ForkLift.app/Contents/Resources";
pub const DEFAULT_ICON: &str = "icon.png";
pub const UPDATE_ICON: &str = "update-available.png";

pub fn icon_for(favourite: &Favourite) -> Icon {
    match &favourite.connection_type {
        ConnectionType::Local => Icon::file_icon(&favourite.path),
        ConnectionType::Unknown(tag) => {
            logging::warn(&format!("unknown type: {tag}"));
            Icon::image(DEFAULT_ICON)
        }
        connection_type => Icon::image(&connection_icon_path(connection_type)),
    }
}

fn connection_icon_path(connection_type: &ConnectionType) -> String {
    let name = match connection_type {
        ConnectionType::WebDavSecure => "WebDAV",
        other => other.as_tag(),
    };
    format!("{FORKLIFT_RESOURCES}/Connection{name}.icns")
}
