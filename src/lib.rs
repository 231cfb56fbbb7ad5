// ============================================================================
// LazyFX - Library
// ============================================================================
// Détection de montants dans un texte sélectionné + conversion de devise
// avec cache des taux. Le binaire (main.rs) n'est qu'une surface d'appel.
// ============================================================================

pub mod api;       // Service de taux de change (HTTP)
pub mod app;       // État de l'application TUI
pub mod config;    // Configuration (défauts + variables d'environnement)
pub mod converter; // Orchestration texte -> notification
pub mod error;     // Erreurs du domaine
pub mod models;    // Structures de données
pub mod parser;    // Détection montant + devise
pub mod rates;     // Cache des taux + fournisseur
pub mod ui;        // Interface utilisateur
