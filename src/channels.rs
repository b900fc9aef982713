use std::path::Path;

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};

/// A channel listed in the channels file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelsFile {
    #[serde(default)]
    channels: Vec<ChannelEntry>,
}

/// Load channels from a JSON file of the form `{"channels": [{"id": ..., "name": ...}]}`
pub fn load(path: &Path) -> Result<Vec<ChannelEntry>> {
    let content = std::fs::read_to_string(path).wrap_err_with(|| format!("reading channels file {}", path.display()))?;
    let channels = parse(&content).wrap_err_with(|| format!("parsing channels file {}", path.display()))?;
    debug!("Loaded {} channels from {}", channels.len(), path.display());
    Ok(channels)
}

pub fn parse(content: &str) -> Result<Vec<ChannelEntry>> {
    let file: ChannelsFile = serde_json::from_str(content)?;
    Ok(file.channels)
}

/// Keep the entries whose name is in `names`; an empty `names` keeps everything.
pub fn select(entries: Vec<ChannelEntry>, names: &[String]) -> Vec<ChannelEntry> {
    if names.is_empty() {
        return entries;
    }
    entries.into_iter().filter(|e| names.contains(&e.name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "channels": [
            {"id": "UC1", "name": "Alpha Finance"},
            {"id": "UC2", "name": "Beta Markets"},
            {"id": "UC3", "name": "Gamma Money"}
        ]
    }"#;

    #[test]
    fn test_parse() {
        let channels = parse(SAMPLE).unwrap();
        assert_eq!(channels.len(), 3);
        assert_eq!(channels[1].id, "UC2");
        assert_eq!(channels[1].name, "Beta Markets");
    }

    #[test]
    fn test_parse_missing_key() {
        assert!(parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse("not json").is_err());
    }

    #[test]
    fn test_select_all() {
        let channels = parse(SAMPLE).unwrap();
        assert_eq!(select(channels, &[]).len(), 3);
    }

    #[test]
    fn test_select_by_name() {
        let channels = parse(SAMPLE).unwrap();
        let picked = select(channels, &["Gamma Money".to_string(), "Nobody".to_string()]);
        assert_eq!(picked, vec![ChannelEntry {
            id: "UC3".to_string(),
            name: "Gamma Money".to_string(),
        }]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/channels.json")).unwrap_err();
        assert!(err.to_string().contains("reading channels file"));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("ytscout-channels-{}.json", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();
        let channels = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(channels.len(), 3);
    }
}
