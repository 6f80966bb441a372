use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Env var pointing at a JSON config file, used when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "OPTION_SIGNALS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ── Application config ──────────────────────────────────────────────

/// Top-level configuration. Every field has a default so a partial file
/// (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Symbols analyzed per run, in output order.
    pub symbols: Vec<String>,
    pub engine: EngineConfig,
    pub fetch: FetchSettings,
    /// Seconds between dashboard refresh runs.
    pub refresh_interval_secs: u64,
    /// Directory CSV/JSON reports are written to.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            engine: EngineConfig::default(),
            fetch: FetchSettings::default(),
            refresh_interval_secs: 30,
            output_dir: PathBuf::from("signals"),
        }
    }
}

fn default_symbols() -> Vec<String> {
    [
        "NIFTY", "BANKNIFTY", "RELIANCE", "TCS", "INFY", "HDFCBANK", "ICICIBANK", "KOTAKBANK",
        "BHARTIARTL", "ITC", "SBIN", "ASIANPAINT", "MARUTI", "TATAMOTORS", "TATASTEEL",
        "BAJFINANCE", "WIPRO", "HCLTECH", "LT", "AXISBANK",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl AppConfig {
    /// Load from `path`, falling back to `$OPTION_SIGNALS_CONFIG`, then to
    /// the built-in defaults. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.normalize_symbols();
        config.validate()?;
        Ok(config)
    }

    /// Trim and uppercase symbol names, dropping later duplicates.
    pub fn normalize_symbols(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.symbols = std::mem::take(&mut self.symbols)
            .into_iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| seen.insert(s.clone()))
            .collect();
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("symbol names must be non-empty".into()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_secs must be at least 1".into(),
            ));
        }
        self.engine.validate()?;
        self.fetch.validate()
    }
}

// ── Engine config ───────────────────────────────────────────────────

/// Parameters of the signal decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Strikes taken on each side of the ATM strike.
    pub radius: usize,
    pub thresholds: Thresholds,
    pub weights: ScoringWeights,
    pub indicators: IndicatorSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            radius: 5,
            thresholds: Thresholds::default(),
            weights: ScoringWeights::default(),
            indicators: IndicatorSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.weights.validate()?;
        self.indicators.validate()
    }
}

/// Parameters of the overview indicators (IV skew, volume/OI activity).
/// They never affect the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IndicatorSettings {
    /// OTM strikes averaged on each side of ATM for the IV skew.
    pub skew_strikes: usize,
    /// Skew, in percent of ATM IV, above which the market reads as fear
    /// (puts) or greed (calls).
    pub skew_alert_pct: f64,
    /// Per-leg volume/OI ratio above which a strike counts as high activity.
    pub high_activity_ratio: f64,
    /// Average call volume/OI ratio above which the chain has momentum.
    pub moderate_activity_ratio: f64,
    /// Maximum high-activity strikes reported per side.
    pub activity_strikes: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            skew_strikes: 5,
            skew_alert_pct: 10.0,
            high_activity_ratio: 0.5,
            moderate_activity_ratio: 0.2,
            activity_strikes: 5,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.skew_alert_pct,
            self.high_activity_ratio,
            self.moderate_activity_ratio,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0);
        if !finite {
            return Err(ConfigError::Invalid(
                "indicator thresholds must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Classifier thresholds. The bearish PCR levels are the reciprocals of
/// the bullish ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Thresholds {
    pub pcr_strong: f64,
    pub pcr_weak: f64,
    /// Window OI ratio at or above which one bullish point is added.
    pub bull_oi: f64,
    /// Window OI ratio at or below which one bearish point is added.
    pub bear_oi: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pcr_strong: 1.5,
            pcr_weak: 1.2,
            bull_oi: 1.3,
            bear_oi: 0.7,
        }
    }
}

impl Thresholds {
    pub fn bearish_strong(&self) -> f64 {
        1.0 / self.pcr_strong
    }

    pub fn bearish_weak(&self) -> f64 {
        1.0 / self.pcr_weak
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.pcr_strong, self.pcr_weak, self.bull_oi, self.bear_oi]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::Invalid("thresholds must be finite".into()));
        }
        if !(self.pcr_weak > 0.0 && self.pcr_strong > self.pcr_weak) {
            return Err(ConfigError::Invalid(format!(
                "expected pcr_strong > pcr_weak > 0, got {} and {}",
                self.pcr_strong, self.pcr_weak
            )));
        }
        if !(self.bear_oi >= 0.0 && self.bull_oi > self.bear_oi) {
            return Err(ConfigError::Invalid(format!(
                "expected bull_oi > bear_oi >= 0, got {} and {}",
                self.bull_oi, self.bear_oi
            )));
        }
        Ok(())
    }
}

/// Fixed policy constants of the strike scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringWeights {
    pub atm_bonus: f64,
    pub near_atm_bonus: f64,
    pub proximity_base: f64,
    pub proximity_decay: f64,
    pub oi_unit: f64,
    pub oi_cap: f64,
    pub oi_multiplier: f64,
    pub coi_unit: f64,
    pub volume_unit: f64,
    pub volume_cap: f64,
    pub iv_base: f64,
    pub iv_divisor: f64,
    pub momentum_bonus: f64,
    /// Volume above which the "High volume" tag is attached.
    pub high_volume_tag: u64,
    /// IV below which the "Low IV" tag is attached.
    pub low_iv_tag: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            atm_bonus: 60.0,
            near_atm_bonus: 50.0,
            proximity_base: 40.0,
            proximity_decay: 5.0,
            oi_unit: 10_000.0,
            oi_cap: 5.0,
            oi_multiplier: 2.0,
            coi_unit: 500.0,
            volume_unit: 1_000.0,
            volume_cap: 3.0,
            iv_base: 5.0,
            iv_divisor: 5.0,
            momentum_bonus: 2.0,
            high_volume_tag: 1_000,
            low_iv_tag: 20.0,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, unit) in [
            ("oi_unit", self.oi_unit),
            ("coi_unit", self.coi_unit),
            ("volume_unit", self.volume_unit),
            ("iv_divisor", self.iv_divisor),
        ] {
            if !(unit.is_finite() && unit > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {unit}"
                )));
            }
        }
        Ok(())
    }
}

// ── Fetch settings ──────────────────────────────────────────────────

/// Settings for the live exchange client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FetchSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Lower bound of the randomized pause before each request.
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
    pub timeout_secs: u64,
    /// Retries after the first attempt, for both session refresh and
    /// transport errors.
    pub max_retries: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            min_delay_secs: 3.0,
            max_delay_secs: 5.0,
            timeout_secs: 10,
            max_retries: 2,
        }
    }
}

impl FetchSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_delay_secs >= 0.0 && self.max_delay_secs >= self.min_delay_secs) {
            return Err(ConfigError::Invalid(format!(
                "expected 0 <= min_delay_secs <= max_delay_secs, got {} and {}",
                self.min_delay_secs, self.max_delay_secs
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.radius, 5);
        assert!((config.engine.thresholds.bearish_strong() - 0.6667).abs() < 1e-3);
        assert!((config.engine.thresholds.bearish_weak() - 0.8333).abs() < 1e-3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"symbols": ["NIFTY"], "engine": {"radius": 3}}"#).unwrap();
        assert_eq!(config.symbols, vec!["NIFTY".to_string()]);
        assert_eq!(config.engine.radius, 3);
        assert_eq!(config.engine.thresholds, Thresholds::default());
        assert_eq!(config.refresh_interval_secs, 30);
    }

    #[test]
    fn test_load_normalizes_symbols() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"symbols": [" nifty", "BankNifty", "NIFTY"]}"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.symbols, vec!["NIFTY", "BANKNIFTY"]);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let thresholds = Thresholds {
            pcr_strong: 1.1,
            pcr_weak: 1.2,
            ..Default::default()
        };
        assert!(matches!(thresholds.validate(), Err(ConfigError::Invalid(_))));

        let thresholds = Thresholds {
            bull_oi: 0.5,
            bear_oi: 0.7,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }
}
