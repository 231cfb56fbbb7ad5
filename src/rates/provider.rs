// ============================================================================
// Structure : RateProvider
// ============================================================================
// Sert une table de taux depuis le cache si elle est valide, sinon la
// récupère auprès de la source (exactement un appel) et remplace l'entrée.
//
// Politique d'erreur :
// - un échec de récupération laisse l'entrée précédente intacte
// - aucune relance automatique, aucun repli sur une entrée expirée
// - pas de fusion des requêtes concurrentes : deux demandes simultanées
//   pour une devise expirée peuvent chacune déclencher un appel
//
// CONCEPT : "fire, cache, maybe orphan"
// - si l'appelant abandonne la demande, l'appel réseau va à son terme et
//   remplit quand même le cache ; seul le résultat est perdu
// ============================================================================

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::RateSource;
use crate::error::FetchError;
use crate::models::{RateAge, RateTable};
use crate::rates::cache::RateCache;

/// Accès aux taux : cache + source réseau
#[derive(Clone)]
pub struct RateProvider {
    cache: Arc<RateCache>,
    source: Arc<dyn RateSource>,
}

impl RateProvider {
    pub fn new(cache: Arc<RateCache>, source: Arc<dyn RateSource>) -> Self {
        Self { cache, source }
    }

    pub fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    /// Table des taux relatifs à `base`
    pub async fn get_rates(&self, base: &str) -> Result<RateTable, FetchError> {
        self.get_rates_with_age(base).await.map(|(rates, _)| rates)
    }

    /// Table des taux et âge de cette table
    ///
    /// CONCEPT RUST : portée des verrous
    /// - la lecture du cache prend la table et son âge sous un seul verrou
    /// - aucun verrou n'est tenu pendant l'appel réseau
    /// - une table tout juste récupérée a l'âge "just now"
    pub async fn get_rates_with_age(&self, base: &str) -> Result<(RateTable, RateAge), FetchError> {
        if let Some(cached) = self.cache.get_valid_with_age(base).await {
            return Ok(cached);
        }

        info!(base, "Fetching fresh exchange rates");
        match self.source.fetch_rates(base).await {
            Ok(rates) => {
                self.cache.store(base, rates.clone()).await;
                Ok((rates, RateAge::from_minutes(0)))
            }
            Err(e) => {
                warn!(base, error = %e, "Rate fetch failed, cache left untouched");
                Err(e)
            }
        }
    }

    /// Âge du taux en cache pour `base` ("just now" si aucune entrée)
    pub async fn age(&self, base: &str) -> RateAge {
        self.cache
            .age(base)
            .await
            .unwrap_or_else(|| RateAge::from_minutes(0))
    }
}

// ============================================================================
// Tests
// ============================================================================
