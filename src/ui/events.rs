// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier, le collage et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching sur KeyCode + KeyModifiers
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Intervalle entre deux ticks : assez court pour des fondus fluides
pub const TICK_RATE: Duration = Duration::from_millis(50);

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Texte collé d'un bloc (bracketed paste)
    /// CONCEPT : le terminal envoie tout le texte en un seul événement
    /// au lieu d'une rafale de touches
    Paste(String),

    /// Tick régulier (animations, expiration des notifications)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self { tick_rate: TICK_RATE }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus `tick_rate`
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }

        match event::read()? {
            // Sur certains OS, on reçoit Press ET Release :
            // on ne garde que Press pour éviter les doublons
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
            CrosstermEvent::Paste(text) => Ok(Event::Paste(text)),
            // Release, resize, souris... : ignorés
            _ => Ok(Event::Tick),
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================
// Toutes les touches imprimables servent à saisir la sélection : les
// commandes passent donc par Ctrl ou par des touches spéciales.
// ============================================================================

fn is_ctrl_char(event: &Event, wanted: char) -> bool {
    if let Event::Key(key) = event {
        key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&wanted))
    } else {
        false
    }
}

/// Ctrl+C ou Ctrl+Q : quitter
pub fn is_quit_event(event: &Event) -> bool {
    is_ctrl_char(event, 'c') || is_ctrl_char(event, 'q')
}

/// Ctrl+U : effacer la sélection (comme dans un shell)
pub fn is_clear_event(event: &Event) -> bool {
    is_ctrl_char(event, 'u')
}

/// Vérifie si l'événement est Échap
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// Vérifie si l'événement est Entrée
pub fn is_enter_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter)
    } else {
        false
    }
}

/// Vérifie si l'événement est Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Backspace)
    } else {
        false
    }
}

/// Extrait le caractère saisi (sans Ctrl/Alt)
///
/// Les symboles monétaires ("€", "₪") arrivent comme n'importe quel caractère.
pub fn get_char_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        if let KeyCode::Char(c) = key.code {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
