// ============================================================================
// Module : ui
// ============================================================================
// Surface de présentation : ligne de sélection + notification toast
// ============================================================================

pub mod events;       // Gestion des événements clavier / collage
pub mod notification; // Toast : cycle de vie, fondus, positionnement
pub mod screen;       // Rendu de l'écran principal

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use notification::Notification;
pub use screen::render;
