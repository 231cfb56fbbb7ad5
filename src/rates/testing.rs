// ============================================================================
// Doublures de test : horloge manuelle + fausse source de taux
// ============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::StatusCode;

use crate::api::RateSource;
use crate::error::FetchError;
use crate::models::RateTable;
use crate::rates::clock::Clock;

/// Horloge figée qu'on avance à la main
#[derive(Debug)]
pub struct ManualClock {
    start: DateTime<Utc>,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
            offset: Mutex::new(Duration::zero()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap();
        *offset = *offset + by;
    }

    pub fn set_offset(&self, offset: Duration) {
        *self.offset.lock().unwrap() = offset;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.start + *self.offset.lock().unwrap()
    }
}

/// Fausse source : tables fixes, compteur d'appels, panne simulée
#[derive(Debug, Default)]
pub struct FakeRateSource {
    tables: Mutex<HashMap<String, RateTable>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Option<std::time::Duration>,
}

impl FakeRateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaque appel attend `delay` avant de répondre
    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_table(&self, base: &str, table: RateTable) {
        self.tables.lock().unwrap().insert(base.to_string(), table);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for FakeRateSource {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }

        let table = self.tables.lock().unwrap().get(base).cloned();
        table.ok_or(FetchError::Status(StatusCode::NOT_FOUND))
    }
}
