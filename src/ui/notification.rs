// ============================================================================
// Notification toast
// ============================================================================
// Affiche le résultat d'une conversion près de la sélection, puis disparaît
//
// Cycle de vie :
//   apparition (fondu 200 ms) -> visible -> disparition (fondu 300 ms)
//   - disparition automatique 5 s après l'apparition
//   - disparition manuelle (Échap) à tout moment, avec le même fondu
//   - une nouvelle notification remplace l'ancienne immédiatement
//
// CONCEPTS RUST :
// 1. std::time::Instant : horloge monotone, idéale pour des animations
// 2. Fonctions pures (phase, popup_area) : testables sans terminal
// ============================================================================

use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::models::DisplayPayload;

/// Délai avant la disparition automatique
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Durée du fondu d'apparition
pub const FADE_IN: Duration = Duration::from_millis(200);

/// Durée du fondu de disparition
pub const FADE_OUT: Duration = Duration::from_millis(300);

/// Largeur maximale du toast (colonnes)
pub const MAX_WIDTH: u16 = 48;

/// Hauteur du toast : bordures + titre + sous-titre + horodatage
pub const HEIGHT: u16 = 5;

/// Écart entre l'ancre et le toast
const OFFSET: u16 = 1;

/// Marge minimale avec les bords de l'écran
const MARGIN: u16 = 1;

// Texte affiché quand le payload n'a pas d'horodatage
const DEFAULT_TIMESTAMP: &str = "Rate updated just now";

/// Étape du cycle de vie d'une notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FadingIn,
    Visible,
    FadingOut,
    Expired,
}

/// Une notification affichée
#[derive(Debug, Clone)]
pub struct Notification {
    pub payload: DisplayPayload,
    shown_at: Instant,
    dismissed_at: Option<Instant>,
}

impl Notification {
    pub fn new(payload: DisplayPayload, shown_at: Instant) -> Self {
        Self {
            payload,
            shown_at,
            dismissed_at: None,
        }
    }

    /// Début du fondu de sortie : demande manuelle ou délai automatique
    fn fade_out_start(&self) -> Instant {
        let auto = self.shown_at + AUTO_DISMISS_AFTER;
        match self.dismissed_at {
            Some(dismissed) => dismissed.min(auto),
            None => auto,
        }
    }

    /// Demande la fermeture ; sans effet si le fondu a déjà commencé
    pub fn dismiss(&mut self, now: Instant) {
        if self.dismissed_at.is_none() && now < self.fade_out_start() {
            self.dismissed_at = Some(now);
        }
    }

    pub fn phase(&self, now: Instant) -> Phase {
        let fade_out_start = self.fade_out_start();

        if now >= fade_out_start + FADE_OUT {
            Phase::Expired
        } else if now >= fade_out_start {
            Phase::FadingOut
        } else if now.saturating_duration_since(self.shown_at) < FADE_IN {
            Phase::FadingIn
        } else {
            Phase::Visible
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.phase(now) == Phase::Expired
    }

    /// Opacité entre 0.0 et 1.0 (progression linéaire des fondus)
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase(now) {
            Phase::FadingIn => {
                let elapsed = now.saturating_duration_since(self.shown_at);
                elapsed.as_secs_f32() / FADE_IN.as_secs_f32()
            }
            Phase::Visible => 1.0,
            Phase::FadingOut => {
                let elapsed = now.saturating_duration_since(self.fade_out_start());
                1.0 - elapsed.as_secs_f32() / FADE_OUT.as_secs_f32()
            }
            Phase::Expired => 0.0,
        }
    }
}

// ============================================================================
// Positionnement
// ============================================================================

/// Calcule la zone du toast autour de l'ancre (la sélection)
///
/// - au-dessus de l'ancre et centré horizontalement
/// - en dessous s'il n'y a pas la place au-dessus
/// - recadré pour ne jamais déborder à gauche ou à droite
pub fn popup_area(anchor: Rect, screen: Rect) -> Rect {
    let width = MAX_WIDTH.min(screen.width.saturating_sub(2 * MARGIN)).max(1);
    let height = HEIGHT.min(screen.height);

    let top_limit = screen.y + MARGIN;
    let above = anchor.y.checked_sub(height + OFFSET).filter(|y| *y >= top_limit);
    let y = match above {
        Some(y) => y,
        None => (anchor.y + anchor.height + OFFSET).min(screen.bottom().saturating_sub(height)),
    };

    let centered = (anchor.x + anchor.width / 2).saturating_sub(width / 2);
    let max_x = screen.right().saturating_sub(width + MARGIN);
    let x = centered.max(screen.x + MARGIN).min(max_x);

    Rect::new(x, y, width, height)
}

// ============================================================================
// Rendu
// ============================================================================

/// Atténue une couleur selon l'opacité (le terminal n'a pas d'alpha)
fn faded(color: Color, opacity: f32) -> Color {
    if opacity >= 0.66 {
        color
    } else if opacity >= 0.33 {
        Color::Gray
    } else {
        Color::DarkGray
    }
}

/// Dessine la notification ancrée sur `anchor`
pub fn render_notification(frame: &mut Frame, notification: &Notification, anchor: Rect, now: Instant) {
    if notification.is_expired(now) {
        return;
    }

    let opacity = notification.opacity(now);
    let payload = &notification.payload;
    let accent = if payload.success { Color::Green } else { Color::Red };

    let area = popup_area(anchor, frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(faded(accent, opacity)))
        .title(" ✕ Esc ")
        .title_alignment(Alignment::Right);

    let timestamp = if payload.timestamp.is_empty() {
        DEFAULT_TIMESTAMP
    } else {
        payload.timestamp.as_str()
    };

    let text = vec![
        Line::from(Span::styled(
            payload.title.clone(),
            Style::default()
                .fg(faded(Color::White, opacity))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            payload.subtitle.clone(),
            Style::default().fg(faded(Color::Gray, opacity)),
        )),
        Line::from(Span::styled(
            timestamp.to_string(),
            Style::default()
                .fg(faded(Color::DarkGray, opacity))
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    // Clear : efface ce qui se trouve sous le toast
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(shown_at: Instant) -> Notification {
        Notification::new(DisplayPayload::success("28 USD = 103.60 ₪", "rate", ""), shown_at)
    }

    #[test]
    fn test_auto_dismiss_phases() {
        let t0 = Instant::now();
        let n = notification(t0);

        assert_eq!(n.phase(t0), Phase::FadingIn);
        assert_eq!(n.phase(t0 + Duration::from_millis(150)), Phase::FadingIn);
        assert_eq!(n.phase(t0 + Duration::from_secs(1)), Phase::Visible);
        assert_eq!(n.phase(t0 + Duration::from_millis(4850)), Phase::Visible);
        assert_eq!(n.phase(t0 + Duration::from_millis(4999)), Phase::Visible);
        assert_eq!(n.phase(t0 + Duration::from_secs(5)), Phase::FadingOut);
        assert_eq!(n.phase(t0 + Duration::from_millis(5299)), Phase::FadingOut);
        assert_eq!(n.phase(t0 + Duration::from_millis(5300)), Phase::Expired);
        assert!(n.is_expired(t0 + Duration::from_secs(6)));
    }

    #[test]
    fn test_manual_dismiss_starts_fade_out() {
        let t0 = Instant::now();
        let mut n = notification(t0);

        let t1 = t0 + Duration::from_secs(2);
        n.dismiss(t1);
        assert_eq!(n.phase(t1), Phase::FadingOut);
        assert_eq!(n.phase(t1 + FADE_OUT), Phase::Expired);

        // Une seconde demande ne relance pas le fondu
        n.dismiss(t1 + Duration::from_millis(100));
        assert_eq!(n.phase(t1 + FADE_OUT), Phase::Expired);
    }

    #[test]
    fn test_dismiss_after_auto_fade_is_noop() {
        let t0 = Instant::now();
        let mut n = notification(t0);
        let late = t0 + Duration::from_millis(5100);

        n.dismiss(late);
        assert_eq!(n.phase(t0 + Duration::from_millis(5300)), Phase::Expired);
    }

    #[test]
    fn test_opacity_bounds() {
        let t0 = Instant::now();
        let n = notification(t0);

        assert_eq!(n.opacity(t0), 0.0);
        assert_eq!(n.opacity(t0 + Duration::from_secs(2)), 1.0);
        let mid_fade = n.opacity(t0 + Duration::from_millis(5150));
        assert!(mid_fade > 0.4 && mid_fade < 0.6, "{}", mid_fade);
        assert_eq!(n.opacity(t0 + Duration::from_secs(10)), 0.0);
    }

    #[test]
    fn test_popup_above_anchor_and_centered() {
        let screen = Rect::new(0, 0, 100, 30);
        let anchor = Rect::new(40, 20, 20, 1);

        let area = popup_area(anchor, screen);
        assert_eq!(area.height, HEIGHT);
        assert_eq!(area.width, MAX_WIDTH);
        assert_eq!(area.y, 20 - HEIGHT - 1);
        assert_eq!(area.x, 50 - MAX_WIDTH / 2);
    }

    #[test]
    fn test_popup_below_when_no_room_above() {
        let screen = Rect::new(0, 0, 100, 30);
        let anchor = Rect::new(10, 2, 10, 1);

        let area = popup_area(anchor, screen);
        assert_eq!(area.y, 2 + 1 + 1);
        // Recadré sur la marge gauche
        assert_eq!(area.x, 1);
    }

    #[test]
    fn test_popup_clamped_to_right_edge() {
        let screen = Rect::new(0, 0, 60, 30);
        let anchor = Rect::new(55, 20, 4, 1);

        let area = popup_area(anchor, screen);
        assert!(area.right() <= screen.right() - 1);
    }
}
