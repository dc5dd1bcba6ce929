use std::collections::BTreeMap;
use std::path::PathBuf;

use element_resolution::snapshot::record::{ElementRecord, Position, Role};
use element_resolution::transport::{SnapshotProvider, TransportError};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing fixture {}: {}", path.display(), e))
}

/// Web-style record with a uid and no coordinate.
pub fn web_record(uid: &str, role: Role, text: &str) -> ElementRecord {
    ElementRecord {
        identifier: Some(uid.to_string()),
        role,
        role_name: role.as_str().to_string(),
        text: text.to_string(),
        attributes: BTreeMap::new(),
        position: None,
        raw_line: format!("uid={} {} \"{}\"", uid, role.as_str(), text),
    }
}

/// Mobile-style record with a coordinate and no uid.
pub fn mobile_record(role: Role, text: &str, x: i32, y: i32) -> ElementRecord {
    ElementRecord {
        identifier: None,
        role,
        role_name: role.as_str().to_string(),
        text: text.to_string(),
        attributes: BTreeMap::new(),
        position: Some(Position::new(x, y)),
        raw_line: format!("{} '{}' at ({}, {})", role.as_str(), text, x, y),
    }
}

/// Provider whose transport is gone.
pub struct DisconnectedProvider;

impl SnapshotProvider for DisconnectedProvider {
    fn take_snapshot(&mut self) -> Result<String, TransportError> {
        Err(TransportError::SessionIo("session disconnected".into()))
    }
}
