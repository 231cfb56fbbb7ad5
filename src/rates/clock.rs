// ============================================================================
// Horloge injectable
// ============================================================================
// Le cache lit l'heure via ce trait : les tests avancent le temps à la main
// au lieu d'attendre une heure réelle.
// ============================================================================

use std::fmt::Debug;

use chrono::{DateTime, Utc};

/// Source de l'heure courante
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Horloge système (production)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
