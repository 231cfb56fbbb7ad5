// ============================================================================
// Écran principal
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
//   ┌──────── LazyFX ────────┐   en-tête : devise cible
//   │ historique             │   dernières conversions
//   │        ┌─toast─┐       │   notification ancrée sur la sélection
//   │ > $28                  │   ligne de sélection
//   └ aide / chargement ─────┘   footer
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Widgets : Block, Paragraph, List
// ============================================================================

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::notification::render_notification;

// Préfixe de la ligne de sélection
const PROMPT: &str = "> ";

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_history(frame, app, chunks[1]);
    let anchor = render_selection(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    // En dernier : le toast passe au-dessus du reste
    if let Some(notification) = &app.notification {
        render_notification(frame, notification, anchor, now);
    }
}

/// Crée le layout principal (header, historique, sélection, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Historique : tout le reste
            Constraint::Length(3), // Ligne de sélection
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyFX ")
        .title_alignment(Alignment::Center);

    let text = Line::from(vec![
        Span::raw("Convert selected amounts to "),
        Span::styled(
            app.target.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Historique des conversions (vert = succès, rouge = erreur)
fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent ");

    if app.history.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Type or paste a price like \"$28\" or \"50 EUR\", then press Enter",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = app
        .history
        .iter()
        .map(|payload| {
            let color = if payload.success { Color::Green } else { Color::Red };
            ListItem::new(Line::from(vec![
                Span::styled(payload.title.clone(), Style::default().fg(color)),
                Span::styled(
                    format!("  {}", payload.subtitle),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Ligne de sélection ; retourne la zone du texte (ancre du toast)
fn render_selection(frame: &mut Frame, app: &App, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Selection ");

    let text = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Yellow)),
        Span::raw(app.input_buffer.clone()),
    ]);

    frame.render_widget(Paragraph::new(text).block(block), area);

    // Curseur à la fin du texte ; un collage énorme ne doit pas déborder u16
    let prompt_width = PROMPT.chars().count() as u16;
    let text_width = u16::try_from(app.input_buffer.chars().count()).unwrap_or(u16::MAX);
    let inner_x = area.x.saturating_add(1);
    let text_x = inner_x.saturating_add(prompt_width);
    let cursor_x = text_x
        .saturating_add(text_width)
        .min(area.right().saturating_sub(2));
    frame.set_cursor(cursor_x, area.y.saturating_add(1));

    Rect::new(
        text_x,
        area.y.saturating_add(1),
        text_width
            .max(1)
            .min(area.width.saturating_sub(prompt_width.saturating_add(2))),
        1,
    )
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let line = match &app.pending_text {
        Some(text) => Line::from(Span::styled(
            format!("⏳ Converting {}...", text),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" convert  "),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(" dismiss  "),
            Span::styled("Ctrl+U", Style::default().fg(Color::Cyan)),
            Span::raw(" clear  "),
            Span::styled("Ctrl+C", Style::default().fg(Color::Cyan)),
            Span::raw(" quit"),
        ]),
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::models::DisplayPayload;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_shows_selection_and_notification() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new("ILS");
        app.paste("$28");

        let now = Instant::now();
        app.show_notification(
            DisplayPayload::success("28 USD = 103.60", "Exchange rate", "Rate updated just now"),
            now,
        );

        terminal
            .draw(|frame| render(frame, &app, now + std::time::Duration::from_secs(1)))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("> $28"));
        assert!(text.contains("28 USD = 103.60"));
        assert!(text.contains("LazyFX"));
    }

    #[test]
    fn test_render_loading_footer() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new("ILS");
        app.paste("50 EUR");
        app.submit_selection();

        terminal
            .draw(|frame| render(frame, &app, Instant::now()))
            .unwrap();

        assert!(buffer_text(&terminal).contains("Converting 50 EUR"));
    }

    #[test]
    fn test_render_huge_selection() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new("ILS");
        app.paste(&"9".repeat(70_000));

        let now = Instant::now();
        app.show_notification(DisplayPayload::error("Could not detect currency"), now);

        terminal.draw(|frame| render(frame, &app, now)).unwrap();
        assert!(buffer_text(&terminal).contains("> 999"));
    }
}
