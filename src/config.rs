use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::parser::locate::StrategySet;
use crate::parser::rows::ResetPolicy;
use crate::parser::ParseOptions;

pub const ENV_PREFIX: &str = "AIRPORT_DESTS";
pub const CONFIG_FILE: &str = "airport_dests";

const PRIMARY_PROXY: &str = "https://common-airport-destinations.vercel.app/api/proxy?url=";
const PUBLIC_PROXIES: &[&str] = &[
    "https://api.allorigins.win/get?url=",
    "https://corsproxy.io/?",
    "https://api.codetabs.com/v1/proxy?quest=",
    "https://thingproxy.freeboard.io/fetch/",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Own proxy, tried before the public ones.
    pub primary_proxy: Option<String>,
    pub proxies: Vec<String>,
    /// Bodies shorter than this are treated as a failed fetch.
    pub min_body_len: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub search_api: String,
    pub alphabetical_reset: ResetPolicy,
    pub strategies: StrategySet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_proxy: Some(PRIMARY_PROXY.to_string()),
            proxies: PUBLIC_PROXIES.iter().map(|p| p.to_string()).collect(),
            min_body_len: 100,
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (compatible; AirportDestComparator/1.0)".to_string(),
            search_api: "https://en.wikipedia.org/w/api.php".to_string(),
            alphabetical_reset: ResetPolicy::default(),
            strategies: StrategySet::default(),
        }
    }
}

impl Settings {
    /// Defaults, then `airport_dests.toml` if present, then `AIRPORT_DESTS_*`
    /// environment variables (`AIRPORT_DESTS_PROXIES` is comma separated).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment())
    }

    fn load_with(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            reset: self.alphabetical_reset,
            strategies: self.strategies,
        }
    }

    /// Proxy bases in the order they are tried.
    pub fn proxy_chain(&self) -> Vec<String> {
        self.primary_proxy
            .iter()
            .filter(|p| !p.is_empty())
            .chain(self.proxies.iter())
            .cloned()
            .collect()
    }
}

/// `AIRPORT_DESTS_<KEY>` variables; `__` separates nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("proxies")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_proxy_goes_first() {
        let chain = Settings::default().proxy_chain();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain[0], PRIMARY_PROXY);
        assert!(chain[1].contains("allorigins"));
    }

    #[test]
    fn empty_primary_proxy_is_skipped() {
        let settings = Settings {
            primary_proxy: Some(String::new()),
            ..Settings::default()
        };
        assert_eq!(settings.proxy_chain().len(), 4);
    }

    #[test]
    fn defaults_round_trip_through_config() {
        let loaded: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default()).unwrap())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn parse_options_follow_settings() {
        let settings = Settings {
            alphabetical_reset: ResetPolicy::Off,
            strategies: StrategySet::Caption,
            ..Settings::default()
        };
        let opts = settings.parse_options();
        assert_eq!(opts.reset, ResetPolicy::Off);
        assert_eq!(opts.strategies, StrategySet::Caption);
    }

    #[test]
    fn environment_overrides_defaults() {
        let vars = config::Map::from([
            ("AIRPORT_DESTS_MIN_BODY_LEN".to_string(), "250".to_string()),
            ("AIRPORT_DESTS_ALPHABETICAL_RESET".to_string(), "off".to_string()),
            (
                "AIRPORT_DESTS_PROXIES".to_string(),
                "http://a.test/?,http://b.test/?".to_string(),
            ),
            ("UNRELATED_MIN_BODY_LEN".to_string(), "1".to_string()),
        ]);
        let settings = Settings::load_with(environment().source(Some(vars))).unwrap();
        assert_eq!(settings.min_body_len, 250);
        assert_eq!(settings.alphabetical_reset, ResetPolicy::Off);
        assert_eq!(settings.proxies, vec!["http://a.test/?", "http://b.test/?"]);
        assert_eq!(settings.timeout_secs, Settings::default().timeout_secs);
    }
}
