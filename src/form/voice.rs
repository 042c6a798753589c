//! Voice input: capability detection only, no audio capture.

use std::path::Path;

use crate::notify::NotificationKind;

pub const COMING_SOON: &str = "Voice input feature coming soon!";
pub const UNSUPPORTED: &str = "Voice input not supported in this environment";

/// Whether `command` resolves to a file on `PATH` (or is a path itself).
pub fn recognizer_available(command: Option<&str>) -> bool {
    let Some(command) = command.map(str::trim).filter(|c| !c.is_empty()) else {
        return false;
    };
    if command.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(command).is_file();
    }
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(command);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
    })
}

/// The notification a voice request produces.
pub fn response(available: bool) -> (&'static str, NotificationKind) {
    if available {
        (COMING_SOON, NotificationKind::Info)
    } else {
        (UNSUPPORTED, NotificationKind::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_or_blank_is_unavailable() {
        assert!(!recognizer_available(None));
        assert!(!recognizer_available(Some("   ")));
    }

    #[test]
    fn missing_command_is_unavailable() {
        assert!(!recognizer_available(Some("definitely-not-a-recognizer-3f9a")));
    }

    #[test]
    fn explicit_path_is_probed() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = dir.path().join("recognizer");
        std::fs::write(&bin, b"").unwrap();
        assert!(recognizer_available(bin.to_str()));
        assert!(!recognizer_available(dir.path().join("nope").to_str()));
    }

    #[test]
    fn responses() {
        assert_eq!(response(true), (COMING_SOON, NotificationKind::Info));
        assert_eq!(response(false), (UNSUPPORTED, NotificationKind::Warning));
    }
}
