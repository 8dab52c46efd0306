//! Optional user defaults, read from `<config-dir>/toksim/config.json`.
//! Command-line flags always win; invalid values in the file are ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
    pub min_run_size: Option<u32>,
    pub page_width: Option<u32>,
    pub threshold: Option<u32>,
}

pub fn load() -> Option<UserConfig> {
    let path = dirs::config_dir()?.join("toksim").join("config.json");
    if path.exists() {
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_deserializes() {
        let cfg: UserConfig = serde_json::from_str(r#"{"min_run_size": 16}"#).unwrap();
        assert_eq!(cfg.min_run_size, Some(16));
        assert_eq!(cfg.page_width, None);
    }
}
