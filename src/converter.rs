// ============================================================================
// Converter : orchestration texte -> notification
// ============================================================================
// Pipeline d'une demande :
//   texte brut -> parser -> {montant, devise} -> RateProvider -> taux
//   -> montant converti + métadonnées (taux, âge) -> DisplayPayload
//
// Décide aussi de ce qui est montré à l'utilisateur : toutes les erreurs
// deviennent une notification d'erreur, aucune ne fait planter l'appli.
// ============================================================================

use tracing::{error, info, warn};

use crate::config::TargetCurrency;
use crate::error::ConvertError;
use crate::models::{DisplayPayload, ParsedAmount, RateAge};
use crate::parser;
use crate::rates::RateProvider;

/// Résultat d'une conversion réussie
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    /// Le montant est déjà dans la devise cible : aucun appel réseau
    NoConversionNeeded(ParsedAmount),

    /// Montant converti, arrondi à 2 décimales pour l'affichage
    Converted {
        source: ParsedAmount,
        rate: f64,
        converted: f64,
        age: RateAge,
    },
}

/// Arrondi à 2 décimales (centimes)
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Orchestrateur : parser + fournisseur de taux + mise en forme
#[derive(Clone)]
pub struct Converter {
    provider: RateProvider,
    target: TargetCurrency,
}

impl Converter {
    pub fn new(provider: RateProvider, target: TargetCurrency) -> Self {
        Self { provider, target }
    }

    pub fn target(&self) -> &TargetCurrency {
        &self.target
    }

    pub fn provider(&self) -> &RateProvider {
        &self.provider
    }

    /// Convertit un montant déjà détecté vers la devise cible
    pub async fn convert(&self, parsed: &ParsedAmount) -> Result<ConversionOutcome, ConvertError> {
        if self.target.matches(&parsed.currency) {
            info!(amount = parsed.amount, currency = %parsed.currency, "Already in target currency");
            return Ok(ConversionOutcome::NoConversionNeeded(parsed.clone()));
        }

        let (rates, age) = self.provider.get_rates_with_age(&parsed.currency).await?;

        // Un taux nul ou non fini est aussi inutilisable qu'un taux absent
        let rate = rates
            .rate(self.target.code())
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| ConvertError::RateUnavailable {
                base: parsed.currency.clone(),
                target: self.target.code().to_string(),
            })?;

        let converted = round_cents(parsed.amount * rate);

        info!(
            amount = parsed.amount,
            currency = %parsed.currency,
            target_currency = self.target.code(),
            rate,
            converted,
            "Conversion done"
        );

        Ok(ConversionOutcome::Converted {
            source: parsed.clone(),
            rate,
            converted,
            age,
        })
    }

    /// Détecte puis convertit
    pub async fn convert_text(&self, text: &str) -> Result<ConversionOutcome, ConvertError> {
        let parsed = parser::parse(text).ok_or(ConvertError::ParseNotFound)?;
        self.convert(&parsed).await
    }

    /// Point d'entrée de la surface d'invocation : ne retourne jamais d'erreur
    pub async fn handle_selection(&self, text: &str) -> DisplayPayload {
        let result = self.convert_text(text).await;
        self.payload_for(&result)
    }

    /// Met en forme le résultat pour la notification
    pub fn payload_for(&self, result: &Result<ConversionOutcome, ConvertError>) -> DisplayPayload {
        match result {
            Ok(ConversionOutcome::NoConversionNeeded(parsed)) => DisplayPayload::success(
                format!("Already in {}", self.target.short_name()),
                format!("{} {}", parsed.amount, self.target.symbol()),
                "",
            ),
            Ok(ConversionOutcome::Converted {
                source,
                rate,
                converted,
                age,
            }) => DisplayPayload::success(
                format!(
                    "{} {} = {:.2} {}",
                    source.amount,
                    source.currency,
                    converted,
                    self.target.symbol()
                ),
                format!(
                    "Exchange rate: 1 {} = {:.4} {}",
                    source.currency,
                    rate,
                    self.target.code()
                ),
                age.timestamp_text(),
            ),
            Err(ConvertError::ParseNotFound) => {
                DisplayPayload::error(ConvertError::ParseNotFound.to_string())
            }
            Err(e) => {
                if e.is_fetch() {
                    warn!(error = %e, "Conversion failed (rate service)");
                } else {
                    error!(error = %e, "Conversion failed");
                }
                DisplayPayload::error(format!("Failed to convert: {}", e))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
