// ============================================================================
// Structures : RateTable, CacheEntry, RateAge
// ============================================================================
// Données de taux de change telles que fournies par l'API, et métadonnées
// nécessaires au cache (date de récupération, âge lisible)
//
// CONCEPTS RUST :
// 1. Newtype pattern : RateTable enveloppe une HashMap pour exposer
//    seulement les opérations utiles
// 2. #[serde(transparent)] : désérialise la HashMap directement
// 3. chrono::Duration : arithmétique sur les dates (now - fetched_at)
// ============================================================================

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Table de taux pour une devise de base
///
/// Chaque valeur est le multiplicateur "1 BASE = x CODE".
/// Remplacée en bloc à chaque rafraîchissement (jamais fusionnée).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RateTable(HashMap<String, f64>);

impl RateTable {
    /// Taux vers la devise `code`, si présent dans la table
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// CONCEPT RUST : FromIterator
/// - Permet `[("ILS", 3.7)].into_iter().collect::<RateTable>()`
impl<K: Into<String>> FromIterator<(K, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Entrée du cache : une par devise de base demandée
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Devise de base de la table (ex: "USD")
    pub base: String,

    /// Taux relatifs à `base`
    pub rates: RateTable,

    /// Instant de la récupération réussie
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(base: impl Into<String>, rates: RateTable, fetched_at: DateTime<Utc>) -> Self {
        Self {
            base: base.into(),
            rates,
            fetched_at,
        }
    }

    /// Âge de l'entrée à l'instant `now`
    ///
    /// Une horloge qui recule donnerait une durée négative : on la ramène à 0.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).max(Duration::zero())
    }

    /// L'entrée est valide si `now - fetched_at < ttl` (strictement)
    pub fn is_valid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

// ============================================================================
// RateAge : âge lisible d'un taux
// ============================================================================
// Purement présentationnel : n'influence jamais la validité du cache
// ============================================================================

/// Âge d'un taux, arrondi à la minute inférieure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateAge {
    minutes: i64,
}

impl RateAge {
    /// Construit un âge à partir d'une durée (tronquée à la minute)
    pub fn from_duration(age: Duration) -> Self {
        Self {
            minutes: age.num_minutes().max(0),
        }
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            minutes: minutes.max(0),
        }
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Libellé court : "just now", "5 minutes ago", "2 hours ago"
    ///
    /// CONCEPT RUST : match avec guards sur des plages
    /// - Les heures sont une division entière (119 min => 1 heure)
    pub fn label(&self) -> String {
        match self.minutes {
            m if m < 1 => "just now".to_string(),
            1 => "1 minute ago".to_string(),
            m if m < 60 => format!("{} minutes ago", m),
            m => match m / 60 {
                1 => "1 hour ago".to_string(),
                h => format!("{} hours ago", h),
            },
        }
    }

    /// Texte affiché dans le champ `timestamp` de la notification
    pub fn timestamp_text(&self) -> String {
        format!("Rate updated {}", self.label())
    }
}

impl fmt::Display for RateAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table_lookup() {
        let table: RateTable = [("ILS", 3.7), ("EUR", 0.92)].into_iter().collect();
        assert_eq!(table.rate("ILS"), Some(3.7));
        assert_eq!(table.rate("GBP"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rate_table_deserializes_from_json_object() {
        let table: RateTable = serde_json::from_str(r#"{"ILS": 3.71, "USD": 1}"#).unwrap();
        assert_eq!(table.rate("USD"), Some(1.0));
        assert_eq!(table.rate("ILS"), Some(3.71));
    }

    #[test]
    fn test_cache_entry_validity_is_strict() {
        let fetched_at = Utc::now();
        let entry = CacheEntry::new("USD", RateTable::default(), fetched_at);
        let ttl = Duration::hours(1);

        assert!(entry.is_valid(fetched_at, ttl));
        assert!(entry.is_valid(fetched_at + Duration::minutes(59), ttl));
        // Exactement au TTL : l'entrée n'est plus valide
        assert!(!entry.is_valid(fetched_at + ttl, ttl));
    }

    #[test]
    fn test_cache_entry_age_never_negative() {
        let fetched_at = Utc::now();
        let entry = CacheEntry::new("USD", RateTable::default(), fetched_at);
        assert_eq!(entry.age(fetched_at - Duration::minutes(5)), Duration::zero());
    }

    #[test]
    fn test_age_labels() {
        let cases = [
            (0, "just now"),
            (1, "1 minute ago"),
            (2, "2 minutes ago"),
            (59, "59 minutes ago"),
            (60, "1 hour ago"),
            (119, "1 hour ago"),
            (120, "2 hours ago"),
            (179, "2 hours ago"),
        ];

        for (minutes, expected) in cases {
            assert_eq!(RateAge::from_minutes(minutes).label(), expected, "{} min", minutes);
        }
    }

    #[test]
    fn test_age_from_duration_floors_to_minute() {
        assert_eq!(RateAge::from_duration(Duration::seconds(59)).label(), "just now");
        assert_eq!(RateAge::from_duration(Duration::seconds(61)).label(), "1 minute ago");
        assert_eq!(
            RateAge::from_duration(Duration::minutes(45)).timestamp_text(),
            "Rate updated 45 minutes ago"
        );
    }
}
