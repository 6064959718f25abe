use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::BotwireConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "botwire.toml",
    "botwire.yaml",
    "botwire.yml",
    "botwire.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<BotwireConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./botwire.{toml,yaml,yml,json}`
/// 2. `<user config dir>/botwire/botwire.{toml,yaml,yml,json}`
///
/// Falls back to `BotwireConfig::default()` when nothing loads.
pub fn discover_and_load() -> BotwireConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return BotwireConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            BotwireConfig::default()
        },
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (e.g. `~/.config/botwire/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "botwire").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<BotwireConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_with_botframework_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("botwire.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind = "0.0.0.0"
port = 8080

[channels.botframework]
app_id = "abc"
app_key = "secret"
"#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        let bf = cfg.channels.botframework.unwrap();
        assert_eq!(bf["app_id"], "abc");
        assert_eq!(bf["app_key"], "secret");
    }

    #[test]
    fn loads_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("botwire.yaml");
        std::fs::write(&yaml, "server:\n  port: 9000\n").unwrap();
        assert_eq!(load_config(&yaml).unwrap().server.port, 9000);

        let json = dir.path().join("botwire.json");
        std::fs::write(&json, r#"{"channels": {"botframework": {"app_id": "x"}}}"#).unwrap();
        let cfg = load_config(&json).unwrap();
        assert_eq!(cfg.server.port, 3978);
        assert_eq!(cfg.channels.botframework.unwrap()["app_id"], "x");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("botwire.ini");
        std::fs::write(&path, "port=1").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/botwire.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/botwire.toml"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("botwire.toml");
        std::fs::write(&path, "").unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert!(cfg.channels.botframework.is_none());
    }
}
