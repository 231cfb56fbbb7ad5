// ============================================================================
// Module : rates
// ============================================================================
// Taux de change : cache avec durée de vie + fournisseur (cache ou réseau)
// ============================================================================

pub mod cache;    // RateCache : entrées par devise de base, TTL
pub mod clock;    // Horloge injectable
pub mod provider; // RateProvider : cache d'abord, réseau sinon

#[cfg(test)]
pub(crate) mod testing;

pub use cache::RateCache;
pub use clock::{Clock, SystemClock};
pub use provider::RateProvider;
