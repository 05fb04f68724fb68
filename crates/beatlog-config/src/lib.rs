mod config;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use beatlog_core::{BeatlogError, BeatlogResult};

pub use config::{ApiConfig, BeatlogConfig, OutputConfig, PlaylistConfig};

pub fn config_path() -> BeatlogResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BeatlogError::Config("home directory not found".to_string()))?;
    Ok(home.join(".beatlog").join("config.toml"))
}

pub fn load_config() -> BeatlogResult<BeatlogConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(BeatlogConfig::default());
    }
    let content = fs::read_to_string(&path)
        .map_err(|err| BeatlogError::Config(format!("failed to read config: {err}")))?;
    let config = toml::from_str(&content)
        .map_err(|err| BeatlogError::Config(format!("failed to parse config: {err}")))?;
    Ok(config)
}

pub fn save_config(config: &BeatlogConfig) -> BeatlogResult<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| BeatlogError::Config(format!("failed to create config dir: {err}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|err| BeatlogError::Config(format!("failed to serialize config: {err}")))?;
    fs::write(&path, content)
        .map_err(|err| BeatlogError::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

pub fn config_exists() -> BeatlogResult<bool> {
    let path = config_path()?;
    Ok(path.exists())
}

pub fn resolve_gemini_key(config: &BeatlogConfig) -> Option<String> {
    if let Ok(value) = env::var("BEATLOG_GEMINI_KEY") {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    config.api.gemini_key.clone()
}

pub fn resolve_model(config: &BeatlogConfig) -> Option<String> {
    if let Ok(value) = env::var("BEATLOG_MODEL") {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    config.api.model.clone()
}

pub fn resolve_simple_output(config: &BeatlogConfig) -> Option<bool> {
    if let Ok(value) = env::var("BEATLOG_OUTPUT_SIMPLE") {
        let normalized = value.to_lowercase();
        return Some(normalized == "1" || normalized == "true" || normalized == "yes");
    }
    config.output.simple
}

pub fn set_config_value(key_path: &str, value: &str) -> BeatlogResult<()> {
    let path = config_path()?;
    let content = if path.exists() {
        fs::read_to_string(&path)
            .map_err(|err| BeatlogError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .unwrap_or_default();

    let parts: Vec<&str> = key_path.split('.').collect();
    if parts.len() < 2 {
        return Err(BeatlogError::Config(
            "key path must have at least 2 parts (e.g., 'api.gemini_key')".to_string(),
        ));
    }

    let table = doc.as_table_mut();
    let mut current = table;
    for part in &parts[..parts.len() - 1] {
        current = current
            .entry(part)
            .or_insert(toml_edit::Item::Table(Default::default()))
            .as_table_mut()
            .ok_or_else(|| {
                BeatlogError::Config(format!("cannot set nested value in '{}'", key_path))
            })?;
    }

    let last_part = parts.last().unwrap();
    current[last_part] = coerce_value(value);

    let content = doc.to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| BeatlogError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(&path, content)
        .map_err(|err| BeatlogError::Config(format!("failed to write config: {err}")))?;

    Ok(())
}

// Keep `playlist.song_count = 7` an integer and `output.simple = true` a
// boolean, otherwise the next load rejects the file.
fn coerce_value(value: &str) -> toml_edit::Item {
    if let Ok(boolean) = value.parse::<bool>() {
        return toml_edit::value(boolean);
    }
    if let Ok(integer) = value.parse::<i64>() {
        return toml_edit::value(integer);
    }
    toml_edit::value(value)
}

pub fn open_in_editor() -> BeatlogResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&BeatlogConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "vim".to_string()
        } else if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .map_err(|err| BeatlogError::Config(format!("failed to open editor '{}': {}", editor, err)))?;

    if !status.success() {
        return Err(BeatlogError::Config(format!(
            "editor exited with status: {}",
            status
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BeatlogConfig, coerce_value};

    #[test]
    fn parses_partial_config() {
        let config: BeatlogConfig = toml::from_str(
            r#"
            [api]
            gemini_key = "test-key"

            [playlist]
            song_count = 5
            cover_art = false
            "#,
        )
        .unwrap();
        assert_eq!(config.api.gemini_key.as_deref(), Some("test-key"));
        assert_eq!(config.api.model, None);
        assert_eq!(config.playlist.song_count, Some(5));
        assert_eq!(config.playlist.cover_art, Some(false));
        assert_eq!(config.output.simple, None);
    }

    #[test]
    fn parses_empty_config() {
        let config: BeatlogConfig = toml::from_str("").unwrap();
        assert_eq!(config.playlist.song_count, None);
    }

    #[test]
    fn coerces_set_values() {
        assert_eq!(coerce_value("true").as_value().and_then(|v| v.as_bool()), Some(true));
        assert_eq!(coerce_value("7").as_value().and_then(|v| v.as_integer()), Some(7));
        assert_eq!(
            coerce_value("gemini-3-flash-preview").as_value().and_then(|v| v.as_str()),
            Some("gemini-3-flash-preview")
        );
    }
}
