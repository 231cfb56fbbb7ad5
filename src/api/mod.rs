// ============================================================================
// Module : api
// ============================================================================
// Clients des services externes : ici, le service de taux de change
// ============================================================================

pub mod exchange_rate; // Source de taux HTTP + trait RateSource

// Re-export des types principaux
pub use exchange_rate::{HttpRateSource, RateSource};
