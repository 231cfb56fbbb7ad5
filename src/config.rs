// ============================================================================
// Configuration
// ============================================================================
// Valeurs par défaut raisonnables, surchargeables par variables d'environnement
//
//   LAZYFX_TARGET             devise cible (défaut : ILS)
//   LAZYFX_API_URL            endpoint des taux (défaut : exchangerate-api v4)
//   LAZYFX_CACHE_TTL_SECS     durée de vie du cache (défaut : 3600)
//   LAZYFX_HTTP_TIMEOUT_SECS  timeout du client HTTP (défaut : 10)
//
// Le niveau de log reste piloté par RUST_LOG (voir main.rs).
// ============================================================================

use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Duration;

use crate::parser::display_symbol;

pub const DEFAULT_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";
pub const DEFAULT_TARGET: &str = "ILS";
pub const DEFAULT_CACHE_TTL_SECS: i64 = 60 * 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// Alias reconnus pour une devise cible : "NIS" désigne aussi le shekel
const TARGET_ALIASES: &[(&str, &str)] = &[("ILS", "NIS")];

// ============================================================================
// TargetCurrency
// ============================================================================

/// Devise vers laquelle toutes les conversions sont faites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCurrency {
    code: String,
    aliases: Vec<String>,
}

impl TargetCurrency {
    /// Crée une devise cible ; le code est mis en majuscules
    pub fn new(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let aliases = TARGET_ALIASES
            .iter()
            .filter(|(c, _)| *c == code)
            .map(|(_, alias)| alias.to_string())
            .collect();

        Self { code, aliases }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Vrai si `code` désigne la devise cible (code ou alias)
    pub fn matches(&self, code: &str) -> bool {
        self.code == code || self.aliases.iter().any(|alias| alias == code)
    }

    /// Nom court affiché : l'alias usuel s'il existe ("NIS"), sinon le code
    pub fn short_name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(&self.code)
    }

    /// Symbole utilisé après les montants convertis ("₪"), sinon le code
    pub fn symbol(&self) -> &str {
        display_symbol(&self.code).unwrap_or(&self.code)
    }
}

impl Default for TargetCurrency {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

// ============================================================================
// Config
// ============================================================================

/// Configuration complète de l'application
#[derive(Debug, Clone)]
pub struct Config {
    pub target: TargetCurrency,

    /// Endpoint des taux ; la devise de base est ajoutée en fin d'URL
    pub api_url: String,

    /// Durée de validité d'une table de taux en cache
    pub cache_ttl: Duration,

    /// Timeout appliqué par le client HTTP (le cache n'en gère aucun)
    pub http_timeout: StdDuration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetCurrency::default(),
            api_url: DEFAULT_API_URL.to_string(),
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
            http_timeout: StdDuration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Charge la configuration depuis l'environnement du processus
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Charge la configuration depuis une source clé -> valeur quelconque
    ///
    /// CONCEPT RUST : closure générique
    /// - `impl Fn(&str) -> Option<String>` : testable sans toucher à l'env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(target) = non_empty(lookup("LAZYFX_TARGET")) {
            config.target = TargetCurrency::new(&target);
        }

        if let Some(url) = non_empty(lookup("LAZYFX_API_URL")) {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = non_empty(lookup("LAZYFX_CACHE_TTL_SECS")) {
            let secs: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("LAZYFX_CACHE_TTL_SECS invalide : {:?}", raw))?;
            config.cache_ttl = Duration::seconds(i64::from(secs));
        }

        if let Some(raw) = non_empty(lookup("LAZYFX_HTTP_TIMEOUT_SECS")) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("LAZYFX_HTTP_TIMEOUT_SECS invalide : {:?}", raw))?;
            config.http_timeout = StdDuration::from_secs(secs);
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.target.code(), "ILS");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.cache_ttl, Duration::hours(1));
        assert_eq!(config.http_timeout, StdDuration::from_secs(10));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("LAZYFX_TARGET", "eur"),
            ("LAZYFX_API_URL", "http://localhost:8080/latest/"),
            ("LAZYFX_CACHE_TTL_SECS", "120"),
            ("LAZYFX_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.target.code(), "EUR");
        assert_eq!(config.api_url, "http://localhost:8080/latest");
        assert_eq!(config.cache_ttl, Duration::minutes(2));
        assert_eq!(config.http_timeout, StdDuration::from_secs(3));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("LAZYFX_CACHE_TTL_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("LAZYFX_CACHE_TTL_SECS"));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = Config::from_lookup(lookup_from(&[("LAZYFX_TARGET", "  ")])).unwrap();
        assert_eq!(config.target.code(), "ILS");
    }

    #[test]
    fn test_target_aliases() {
        let ils = TargetCurrency::new("ILS");
        assert!(ils.matches("ILS"));
        assert!(ils.matches("NIS"));
        assert!(!ils.matches("USD"));
        assert_eq!(ils.short_name(), "NIS");
        assert_eq!(ils.symbol(), "₪");

        let chf = TargetCurrency::new("chf");
        assert_eq!(chf.short_name(), "CHF");
        assert_eq!(chf.symbol(), "CHF");

        let xau = TargetCurrency::new("XAU");
        assert_eq!(xau.symbol(), "XAU");
    }
}
