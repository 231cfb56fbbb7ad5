// ============================================================================
// Erreurs du domaine
// ============================================================================
// Trois familles d'erreurs, toutes visibles par l'utilisateur mais jamais
// fatales : elles finissent en notification d'erreur, sans retry automatique.
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error + Display
// - #[error("...")] : message affiché
// - #[from] : conversion automatique avec l'opérateur ?
// - anyhow reste utilisé pour la plomberie applicative (main, terminal)
// ============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Échec de la récupération d'une table de taux
#[derive(Debug, Error)]
pub enum FetchError {
    /// Service injoignable (DNS, connexion, timeout du client HTTP)
    #[error("Failed to fetch exchange rate: {0}")]
    Transport(#[source] reqwest::Error),

    /// Réponse HTTP hors 2xx
    #[error("Failed to fetch exchange rate (HTTP {0})")]
    Status(StatusCode),

    /// Corps JSON illisible ou sans objet `rates`
    #[error("Failed to read exchange rate response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Erreurs d'une demande de conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Aucune stratégie du parser n'a reconnu de montant
    #[error("Could not detect currency. Try selecting text like \"$28\" or \"50 EUR\"")]
    ParseNotFound,

    /// Le service de taux n'a pas pu répondre
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// La table a été obtenue mais ne contient pas la devise cible
    #[error("{target} rate not available for {base}")]
    RateUnavailable { base: String, target: String },
}

impl ConvertError {
    /// Vrai pour les erreurs liées au réseau (utile pour le niveau de log)
    pub fn is_fetch(&self) -> bool {
        matches!(self, ConvertError::Fetch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ConvertError::ParseNotFound.to_string(),
            r#"Could not detect currency. Try selecting text like "$28" or "50 EUR""#
        );

        let unavailable = ConvertError::RateUnavailable {
            base: "USD".to_string(),
            target: "ILS".to_string(),
        };
        assert_eq!(unavailable.to_string(), "ILS rate not available for USD");
        assert!(!unavailable.is_fetch());
    }

    #[test]
    fn test_fetch_error_is_transparent() {
        let err: ConvertError = FetchError::Status(StatusCode::SERVICE_UNAVAILABLE).into();
        assert!(err.is_fetch());
        assert_eq!(
            err.to_string(),
            "Failed to fetch exchange rate (HTTP 503 Service Unavailable)"
        );
    }
}
