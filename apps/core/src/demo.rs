use crate::model::{ConnectionType, Favourite};

const DEMO_GROUP: &str = "Data";

/// Fixed sample favourites for screenshots and trying the workflow without
/// ForkLift installed. The order is fixed, not sorted by name.
pub fn demo_favourites() -> Vec<Favourite> {
    [
        ("BA892C03-0300-4A56-AB60-A116FBC4B84C", "Warez", "www.warez.ru", ConnectionType::Ftp),
        ("87ECFC95-FE2F-4327-839B-CE9C2E43C96C", "Ubuntu ISOs", "ftp.ubuntu.com", ConnectionType::Ftp),
        ("16E522BD-1213-4894-8FB1-F86C5C017A0A", "OpenStreetMap", "ftp5.gwdg.de", ConnectionType::Ftp),
        ("3DD969C4-773B-4600-8F8F-13416CC68A57", "Homepage", "webdav.example.com", ConnectionType::WebDav),
        ("711B838F-E565-470E-8086-53ADFFDAA32E", "NAS", "192.168.0.5", ConnectionType::Workspace),
        ("8935EF9D-BBB6-4B0B-87E4-80CCA3E84DE6", "S3 Bucket", "mybucket.amazon.com", ConnectionType::S3),
        ("FA1B24E2-32ED-42BE-B28E-00534223EBFD", "www.example.com", "server.example.com", ConnectionType::Sftp),
        ("751DA871-C5D5-44C6-BA29-B8CF6CBFA0FF", "demo.example.com", "server.example.com", ConnectionType::Sftp),
        ("56AD2BFC-A7CD-4085-BED0-E50E2E5FB6D1", "reynolds.com", "reynolds.com", ConnectionType::Workspace),
        ("1857118C-08C6-4AB1-B2BA-3A6B02318F59", "ullmann.org", "ullmann.org", ConnectionType::Sftp),
        ("B21FBB02-048F-44B5-93D8-0E08E8A8D4D6", "Server Logs", "fiebig.net", ConnectionType::Sync),
        ("45125B47-75BC-4CE3-A864-941B4CE24422", "iPhone (8080)", "192.168.0.2", ConnectionType::WebDav),
    ]
    .into_iter()
    .map(|(id, name, server, connection_type)| {
        Favourite::new(id, name, DEMO_GROUP, "", server, connection_type)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::demo_favourites;

    #[test]
    fn demo_data_is_deterministic_and_remote_only() {
        let first = demo_favourites();
        assert_eq!(first.len(), 12);
        assert_eq!(first, demo_favourites());
        assert!(first.iter().all(|f| !f.connection_type.is_local()));
        assert!(first.iter().all(|f| f.group == "Data"));
    }
}
