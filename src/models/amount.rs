// ============================================================================
// Structure : ParsedAmount
// ============================================================================
// Montant détecté dans un texte sélectionné, avec le code devise associé
//
// CONCEPTS RUST :
// 1. Immutabilité : une fois créé, un ParsedAmount ne change plus
// 2. Display : affichage naturel "28 USD" via le trait fmt::Display
// ============================================================================

use std::fmt;

use serde::Serialize;

/// Montant + devise extraits d'un texte libre
///
/// Invariants garantis par le parser :
/// - `amount` est fini (jamais NaN ni infini)
/// - `currency` fait exactement 3 lettres ASCII majuscules
///   (les symboles comme "$" sont déjà traduits en "USD")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedAmount {
    /// Montant tel qu'écrit dans le texte (ex: 1234.56)
    pub amount: f64,

    /// Code devise sur 3 lettres (ex: "USD", "EUR")
    pub currency: String,
}

impl ParsedAmount {
    /// Crée un nouveau montant détecté
    ///
    /// CONCEPT RUST : impl Into<String>
    /// - Accepte &str ET String sans conversion explicite à l'appel
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for ParsedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_drops_trailing_zero() {
        // f64 s'affiche sans ".0" superflu, comme dans le texte d'origine
        assert_eq!(ParsedAmount::new(28.0, "USD").to_string(), "28 USD");
        assert_eq!(ParsedAmount::new(1234.56, "EUR").to_string(), "1234.56 EUR");
    }
}
