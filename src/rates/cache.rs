// ============================================================================
// Structure : RateCache
// ============================================================================
// Cache en mémoire des tables de taux, une entrée par devise de base
//
// Règles :
// - une entrée est valide tant que `now - fetched_at < ttl`
// - c'est le SEUL critère d'invalidation (pas d'éviction, pas de LRU)
// - une entrée est remplacée en bloc, jamais fusionnée
// - rien n'est supprimé : la taille est bornée par le nombre de devises
//   de base différentes demandées pendant la vie du processus
//
// CONCEPTS RUST :
// 1. tokio::sync::RwLock : plusieurs lecteurs OU un seul écrivain
// 2. Arc<dyn Clock> : horloge injectée (tests sans attente réelle)
// 3. Portée des verrous : jamais tenus pendant un appel réseau
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::models::{CacheEntry, RateAge, RateTable};
use crate::rates::clock::{Clock, SystemClock};

/// Cache des tables de taux avec durée de vie
#[derive(Debug)]
pub struct RateCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    /// Crée un cache vide utilisant l'horloge système
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Crée un cache vide avec une horloge fournie
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Table en cache pour `base`, seulement si elle est encore valide
    ///
    /// Une entrée expirée n'est jamais servie, même en secours.
    pub async fn get_valid(&self, base: &str) -> Option<RateTable> {
        self.get_valid_with_age(base).await.map(|(rates, _)| rates)
    }

    /// Table valide et son âge, lus sous le même verrou : l'âge décrit
    /// toujours la table retournée
    pub async fn get_valid_with_age(&self, base: &str) -> Option<(RateTable, RateAge)> {
        let now = self.clock.now();
        let entries = self.entries.read().await;

        match entries.get(base) {
            Some(entry) if entry.is_valid(now, self.ttl) => {
                let age = entry.age(now);
                trace!(base, age_secs = age.num_seconds(), "Cache hit");
                Some((entry.rates.clone(), RateAge::from_duration(age)))
            }
            Some(_) => {
                debug!(base, "Cache entry expired");
                None
            }
            None => {
                debug!(base, "Cache miss");
                None
            }
        }
    }

    /// Remplace l'entrée de `base` par une table fraîche
    pub async fn store(&self, base: &str, rates: RateTable) {
        let entry = CacheEntry::new(base, rates, self.clock.now());
        let mut entries = self.entries.write().await;
        debug!(base, rates = entry.rates.len(), "Storing rate table");
        entries.insert(base.to_string(), entry);
    }

    /// Âge de l'entrée de `base` (présente, qu'elle soit valide ou non)
    pub async fn age(&self, base: &str) -> Option<RateAge> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .get(base)
            .map(|entry| RateAge::from_duration(entry.age(now)))
    }

    /// Copie de l'entrée de `base`, pour inspection
    pub async fn entry(&self, base: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(base).cloned()
    }

    /// Nombre de devises de base en cache (entrées expirées comprises)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
