// ============================================================================
// API Client : service de taux de change
// ============================================================================
// Récupère la table des taux pour une devise de base
//   GET {api_url}/{BASE}  ->  { "base": "USD", "rates": { "ILS": 3.7, ... } }
//
// CONCEPTS RUST :
// 1. Trait + async_trait : la source de taux est interchangeable
//    (HTTP en production, fausse source dans les tests)
// 2. Serde : désérialisation du JSON vers des structures typées
// 3. Erreurs typées : FetchError distingue réseau / statut / JSON
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::RateTable;

// ============================================================================
// Trait RateSource
// ============================================================================
// CONCEPT RUST : Send + Sync
// - La source est partagée entre les tâches tokio (Arc<dyn RateSource>)
// - async_trait transforme "async fn" en méthode retournant une Future boxée
// ============================================================================

/// Collaborateur externe qui fournit une table de taux
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Récupère les taux relatifs à `base` (exactement un appel réseau)
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, FetchError>;
}

// ============================================================================
// Réponse JSON
// ============================================================================

/// Réponse de l'API ; seul `rates` est obligatoire
#[derive(Debug, Deserialize)]
struct RatesResponse {
    base: Option<String>,
    date: Option<String>,
    rates: RateTable,
}

// ============================================================================
// HttpRateSource
// ============================================================================

/// Source de taux via HTTP (reqwest)
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    api_url: String,
}

impl HttpRateSource {
    /// Crée le client HTTP à partir de la configuration
    ///
    /// Le timeout est celui du client : le cache n'en impose aucun.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lazyfx/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    #[instrument(skip(self))]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, FetchError> {
        let url = build_rates_url(&self.api_url, base);
        debug!(url = %url, "Sending HTTP request to rate service");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Tout statut hors 2xx est un échec de récupération
        if !status.is_success() {
            error!(status = %status, "Rate service returned error status");
            return Err(FetchError::Status(status));
        }

        let body: RatesResponse = response.json().await.map_err(FetchError::Decode)?;

        info!(
            base = body.base.as_deref().unwrap_or(base),
            date = body.date.as_deref().unwrap_or("-"),
            rates = body.rates.len(),
            "Successfully fetched exchange rates"
        );
        Ok(body.rates)
    }
}

/// Construit l'URL "endpoint/BASE"
fn build_rates_url(api_url: &str, base: &str) -> String {
    format!("{}/{}", api_url.trim_end_matches('/'), base)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serveur HTTP local qui répond une seule fois `response` (brut)
    async fn serve_once(response: String) -> HttpRateSource {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        let config = Config {
            api_url: format!("http://{}/latest", addr),
            http_timeout: std::time::Duration::from_secs(5),
            ..Config::default()
        };
        HttpRateSource::new(&config).unwrap()
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    #[test]
    fn test_build_rates_url() {
        let url = build_rates_url("https://api.exchangerate-api.com/v4/latest", "USD");
        assert_eq!(url, "https://api.exchangerate-api.com/v4/latest/USD");

        // Slash final toléré
        assert_eq!(build_rates_url("http://localhost/", "EUR"), "http://localhost/EUR");
    }

    #[test]
    fn test_parse_rates_response() {
        let json = r#"{
            "provider": "https://www.exchangerate-api.com",
            "base": "USD",
            "date": "2026-10-18",
            "time_last_updated": 1760745601,
            "rates": { "USD": 1, "ILS": 3.71, "EUR": 0.92 }
        }"#;

        let response: RatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.base.as_deref(), Some("USD"));
        assert_eq!(response.rates.rate("ILS"), Some(3.71));
        assert_eq!(response.rates.len(), 3);
    }

    #[test]
    fn test_response_without_rates_is_rejected() {
        let result = serde_json::from_str::<RatesResponse>(r#"{"result": "error"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_uses_configured_url() {
        let config = Config {
            api_url: "http://localhost:9999/latest".to_string(),
            ..Config::default()
        };
        let source = HttpRateSource::new(&config).unwrap();
        assert_eq!(source.api_url(), "http://localhost:9999/latest");
    }

    // Serveur injoignable : l'erreur doit être une erreur de transport
    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = Config {
            api_url: "http://127.0.0.1:9/latest".to_string(),
            http_timeout: std::time::Duration::from_secs(2),
            ..Config::default()
        };
        let source = HttpRateSource::new(&config).unwrap();

        match source.fetch_rates("USD").await {
            Err(FetchError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        let source = serve_once(http_response("503 Service Unavailable", "")).await;

        match source.fetch_rates("USD").await {
            Err(FetchError::Status(status)) => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_without_rates_is_decode_error() {
        let source = serve_once(http_response("200 OK", r#"{"result":"error"}"#)).await;

        match source.fetch_rates("USD").await {
            Err(FetchError::Decode(_)) => {}
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rates_over_http() {
        let body = r#"{"base":"USD","date":"2026-10-18","rates":{"USD":1,"ILS":3.71}}"#;
        let source = serve_once(http_response("200 OK", body)).await;

        let rates = source.fetch_rates("USD").await.unwrap();
        assert_eq!(rates.rate("ILS"), Some(3.71));
        assert_eq!(rates.len(), 2);
    }
}
