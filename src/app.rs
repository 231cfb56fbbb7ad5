// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Instant passé en paramètre : l'état reste testable sans attendre
//
// PATTERN : "Application State"
// - L'UI lit depuis App
// - Toutes les modifications passent par les méthodes de App
// - Seule la boucle d'événements possède App : pas de Mutex nécessaire,
//   le worker communique uniquement par channels
// ============================================================================

use std::time::Instant;

use tracing::debug;

use crate::models::DisplayPayload;
use crate::ui::notification::Notification;

/// Nombre de conversions gardées dans l'historique affiché
pub const HISTORY_LEN: usize = 10;

/// Identifiant d'une demande de conversion
pub type RequestId = u64;

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Texte "sélectionné" : saisi ou collé par l'utilisateur
    pub input_buffer: String,

    /// Devise cible, pour l'en-tête
    pub target: String,

    /// Notification affichée (une seule à la fois)
    pub notification: Option<Notification>,

    /// Dernières conversions, la plus récente en premier
    pub history: Vec<DisplayPayload>,

    /// Demande en attente de résultat
    /// CONCEPT : "fire, cache, maybe orphan"
    /// - un résultat dont l'id ne correspond pas est ignoré
    /// - la tâche réseau, elle, a tout de même rempli le cache
    pub pending_request: Option<RequestId>,

    /// Texte de la demande en attente, pour le footer
    pub pending_text: Option<String>,

    next_request_id: RequestId,
}

impl App {
    /// Crée une application vide pour la devise cible donnée
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            running: true,
            input_buffer: String::new(),
            target: target.into(),
            notification: None,
            history: Vec::new(),
            pending_request: None,
            pending_text: None,
            next_request_id: 1,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_loading(&self) -> bool {
        self.pending_request.is_some()
    }

    // ========================================
    // Saisie de la sélection
    // ========================================

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    /// Collage (bracketed paste) : les retours ligne deviennent des espaces
    pub fn paste(&mut self, text: &str) {
        let flattened = text.replace(['\r', '\n'], " ");
        self.input_buffer.push_str(&flattened);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
    }

    /// Valide la sélection : retourne l'id et le texte à convertir
    ///
    /// Le texte est "pré-trimé" comme une sélection ; vide => rien à faire.
    /// Une demande précédente encore en vol devient orpheline.
    pub fn submit_selection(&mut self) -> Option<(RequestId, String)> {
        let text = self.input_buffer.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let id = self.next_request_id;
        self.next_request_id += 1;

        if let Some(previous) = self.pending_request.replace(id) {
            debug!(previous, id, "Previous request superseded");
        }
        self.pending_text = Some(text.clone());

        Some((id, text))
    }

    // ========================================
    // Notifications
    // ========================================

    /// Reçoit le résultat d'une demande
    ///
    /// Retourne false si la demande a été abandonnée ou remplacée :
    /// le payload est alors ignoré silencieusement.
    pub fn receive_result(&mut self, id: RequestId, payload: DisplayPayload, now: Instant) -> bool {
        if self.pending_request != Some(id) {
            debug!(id, "Dropping result of orphaned request");
            return false;
        }

        self.pending_request = None;
        self.pending_text = None;
        self.show_notification(payload, now);
        true
    }

    /// Affiche une notification, en remplaçant immédiatement la précédente
    pub fn show_notification(&mut self, payload: DisplayPayload, now: Instant) {
        self.history.insert(0, payload.clone());
        self.history.truncate(HISTORY_LEN);
        self.notification = Some(Notification::new(payload, now));
    }

    /// Échap : ferme la notification et abandonne la demande en cours
    pub fn dismiss(&mut self, now: Instant) {
        if let Some(notification) = self.notification.as_mut() {
            notification.dismiss(now);
        }

        if let Some(id) = self.pending_request.take() {
            debug!(id, "Pending request abandoned by user");
            self.pending_text = None;
        }
    }

    /// Tick : retire la notification une fois le fondu terminé
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.notification = None;
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
