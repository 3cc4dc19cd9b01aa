//! Runtime configuration from the environment

use std::path::PathBuf;

/// Overrides the database location
pub const DATABASE_PATH_VAR: &str = "NUTRICALC_DATABASE_PATH";

/// Log filter applied when `RUST_LOG` does not mention the crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "nutricalc=info";

/// Get the database path from the environment or `<project>/data/nutricalc.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutricalc.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_in_data_dir() {
        let path = default_database_path();
        assert!(path.ends_with("data/nutricalc.db"));
    }
}
