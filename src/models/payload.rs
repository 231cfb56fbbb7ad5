// ============================================================================
// Structure : DisplayPayload
// ============================================================================
// Contenu d'une notification : exactement quatre champs, quel que soit le
// résultat (succès, montant déjà dans la devise cible, erreur)
// ============================================================================

use serde::{Deserialize, Serialize};

/// Payload transmis à la surface d'affichage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    /// Ligne principale (ex: "28 USD = 103.60 ₪")
    pub title: String,

    /// Ligne secondaire (ex: "Exchange rate: 1 USD = 3.7000 ILS")
    pub subtitle: String,

    /// false pour un échec de détection ou de conversion
    pub success: bool,

    /// Fraîcheur du taux (ex: "Rate updated 5 minutes ago"), vide sinon
    pub timestamp: String,
}

impl DisplayPayload {
    /// Notification de succès
    pub fn success(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            success: true,
            timestamp: timestamp.into(),
        }
    }

    /// Notification d'erreur : titre fixe "Error", pas d'horodatage
    pub fn error(subtitle: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            subtitle: subtitle.into(),
            success: false,
            timestamp: String::new(),
        }
    }
}
