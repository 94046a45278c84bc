use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    domain::{ChannelTarget, UserId},
    errors::Error,
    Result,
};

/// Bot API refuses downloads above this size unless a self-hosted server is used.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Typed configuration, read from the environment (and an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub bot_token: String,
    pub api_id: Option<i64>,
    pub api_hash: Option<String>,
    pub telegram_api_url: Option<String>,

    // Access
    pub owner_id: UserId,
    pub target_channel: Option<ChannelTarget>,

    // Templates
    pub templates_file: PathBuf,
    pub seed_templates: Vec<String>,

    // Files
    pub temp_dir: PathBuf,
    pub max_file_size: u64,

    // Health check
    pub port: Option<u16>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let cfg = Self::from_lookup(env_str)?;

        // Scratch downloads land here; create it up front so the first upload can't fail on it.
        fs::create_dir_all(&cfg.temp_dir)?;

        Ok(cfg)
    }

    /// Build a config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = get("BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let owner_id = match get("OWNER_ID").and_then(non_empty) {
            Some(raw) => UserId(parse_i64("OWNER_ID", &raw)?),
            None => {
                return Err(Error::Config(
                    "OWNER_ID environment variable is required".to_string(),
                ))
            }
        };

        let api_id = get("API_ID")
            .and_then(non_empty)
            .map(|raw| parse_i64("API_ID", &raw))
            .transpose()?;
        let api_hash = get("API_HASH").and_then(non_empty);
        let telegram_api_url = get("TELEGRAM_API_URL").and_then(non_empty);

        let target_channel = get("TARGET_CHANNEL")
            .and_then(non_empty)
            .map(|raw| ChannelTarget::parse(&raw))
            .transpose()?;

        let templates_file = PathBuf::from(
            get("TEMPLATES_FILE")
                .and_then(non_empty)
                .unwrap_or("templates.json".to_string()),
        );
        let seed_templates = parse_csv_unique(get("TEMPLATES_TO_REMOVE"));

        let temp_dir = get("TEMP_DIR")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("template-remover-bot"));

        let max_file_size = match get("MAX_FILE_SIZE").and_then(non_empty) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("MAX_FILE_SIZE must be a byte count, got {raw:?}"))
            })?,
            None => DEFAULT_MAX_FILE_SIZE,
        };

        let port = match get("PORT").and_then(non_empty) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
                Error::Config(format!("PORT must be a valid port number, got {raw:?}"))
            })?),
            None => None,
        };

        Ok(Self {
            bot_token,
            api_id,
            api_hash,
            telegram_api_url,
            owner_id,
            target_channel,
            templates_file,
            seed_templates,
            temp_dir,
            max_file_size,
            port,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_i64(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("{key} must be numeric, got {raw:?}")))
}

fn parse_csv_unique(v: Option<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in v.unwrap_or_default().split(',').map(str::trim) {
        if item.is_empty() || out.iter().any(|t| t == item) {
            continue;
        }
        out.push(item.to_string());
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::ChatId;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn requires_token_and_owner() {
        let err = Config::from_lookup(lookup(&[("OWNER_ID", "1")])).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));

        let err = Config::from_lookup(lookup(&[("BOT_TOKEN", "t")])).unwrap_err();
        assert!(err.to_string().contains("OWNER_ID"));

        let err =
            Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("OWNER_ID", "me")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn applies_defaults() {
        let cfg = Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("OWNER_ID", "42")])).unwrap();
        assert_eq!(cfg.owner_id, UserId(42));
        assert_eq!(cfg.templates_file, PathBuf::from("templates.json"));
        assert_eq!(cfg.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(cfg.target_channel.is_none());
        assert!(cfg.port.is_none());
        assert!(cfg.api_id.is_none());
        assert!(cfg.seed_templates.is_empty());
    }

    #[test]
    fn parses_optional_values() {
        let cfg = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OWNER_ID", "42"),
            ("API_ID", "12345"),
            ("API_HASH", "abc"),
            ("TARGET_CHANNEL", "-100777"),
            ("PORT", "8080"),
            ("TEMPLATES_TO_REMOVE", " [HD] ,@uploader,, [HD]"),
            ("MAX_FILE_SIZE", "1024"),
        ]))
        .unwrap();

        assert_eq!(cfg.api_id, Some(12345));
        assert_eq!(cfg.api_hash.as_deref(), Some("abc"));
        assert_eq!(cfg.target_channel, Some(ChannelTarget::Id(ChatId(-100777))));
        assert_eq!(cfg.port, Some(8080));
        assert_eq!(cfg.seed_templates, vec!["[HD]", "@uploader"]);
        assert_eq!(cfg.max_file_size, 1024);
    }

    #[test]
    fn rejects_bad_port_and_channel() {
        let err = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OWNER_ID", "42"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OWNER_ID", "42"),
            ("TARGET_CHANNEL", "not a channel"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
