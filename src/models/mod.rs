// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application
// ============================================================================

pub mod amount;  // Montant détecté dans un texte
pub mod payload; // Contenu d'une notification
pub mod rates;   // Tables de taux, entrées du cache, âge d'un taux

// Re-export des structures principales pour simplifier les imports
pub use amount::ParsedAmount;
pub use payload::DisplayPayload;
pub use rates::{CacheEntry, RateAge, RateTable};
