// ============================================================================
// LazyFX - Conversion de devises depuis une sélection de texte
// ============================================================================
// Deux surfaces d'appel pour le même pipeline (parser -> taux -> payload) :
//
//   lazyfx "$28"     mode one-shot : affiche le payload en JSON et quitte
//   lazyfx           mode TUI : ligne de sélection + notification toast
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : runtime tokio + worker thread relié par channels
// 4. Restauration du terminal même en cas d'erreur
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::{Handle, Runtime};
use tracing::{debug, error, info, warn};

use lazyfx::api::HttpRateSource;
use lazyfx::app::{App, RequestId};
use lazyfx::config::Config;
use lazyfx::converter::Converter;
use lazyfx::models::DisplayPayload;
use lazyfx::rates::{RateCache, RateProvider};
use lazyfx::ui::{render, Event, EventHandler};

// ============================================================================
// AppCommand / AppResult : messages avec le worker
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker lance une tâche tokio par conversion
// - Les résultats reviennent par un second channel
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Convertir le texte sélectionné
    Convert { id: RequestId, text: String },
}

/// Résultats renvoyés par le worker
#[derive(Debug)]
enum AppResult {
    /// Payload prêt à afficher (succès ou erreur)
    Converted { id: RequestId, payload: DisplayPayload },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier, avec rotation quotidienne.
// ============================================================================

/// Répertoire des logs
///
/// - Linux : ~/.local/share/lazyfx/logs
/// - macOS : ~/Library/Application Support/lazyfx/logs
/// - Windows : C:\Users\<user>\AppData\Local\lazyfx\logs
/// - Sinon : ./logs
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyfx").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// ```bash
/// tail -f ~/.local/share/lazyfx/logs/lazyfx.log.*
/// RUST_LOG=lazyfx=trace lazyfx
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyfx.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyfx, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyfx=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Le logging d'abord ; en cas d'échec on continue sans
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    let config = Config::from_env().context("Configuration invalide")?;
    info!(target_currency = config.target.code(), api_url = %config.api_url, "LazyFX starting up");

    let runtime = Runtime::new().context("Échec de la création du runtime tokio")?;
    let converter = build_converter(&config)?;

    // Arguments présents : mode one-shot
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let text = args.join(" ");
        let payload = runtime.block_on(converter.handle_selection(text.trim()));
        println!("{}", serde_json::to_string_pretty(&payload)?);

        if !payload.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    run_tui(&runtime, converter, &config)
}

/// Assemble le pipeline : source HTTP -> cache -> fournisseur -> converter
///
/// Le cache vit aussi longtemps que le processus, et il est injecté :
/// aucun état global.
fn build_converter(config: &Config) -> Result<Converter> {
    let source = Arc::new(HttpRateSource::new(config)?);
    let cache = Arc::new(RateCache::new(config.cache_ttl));
    let provider = RateProvider::new(cache, source);
    Ok(Converter::new(provider, config.target.clone()))
}

/// Lance l'interface TUI et restaure le terminal à la fin
fn run_tui(runtime: &Runtime, converter: Converter, config: &Config) -> Result<()> {
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new(config.target.code());

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, converter, runtime.handle().clone());

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Thread + Handle tokio
// - Le thread reçoit les commandes (recv bloquant)
// - Chaque conversion devient une tâche tokio : plusieurs peuvent être en
//   vol en même temps, et le cache est partagé entre elles
// - Une tâche dont la demande a été abandonnée va quand même au bout :
//   elle remplit le cache, son résultat est ignoré par App
// ============================================================================

fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    converter: Converter,
    runtime: Handle,
) {
    std::thread::spawn(move || {
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            match command {
                AppCommand::Convert { id, text } => {
                    let converter = converter.clone();
                    let result_tx = result_tx.clone();

                    runtime.spawn(async move {
                        let payload = converter.handle_selection(&text).await;
                        // Plus de receveur : l'application est en train de quitter
                        if result_tx.send(AppResult::Converted { id, payload }).is_err() {
                            debug!(id, "Result receiver gone, dropping payload");
                        }
                    });
                }
            }
        }

        // Channel fermé, on quitte
        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. récupérer les résultats du worker
//   1. dessiner l'interface (render)
//   2. traiter les événements (input)
//   3. mettre à jour l'état (update : expiration des notifications)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    let mut worker_alive = true;

    while app.is_running() {
        // ========================================
        // 0. RÉSULTATS : try_recv ne bloque pas
        // ========================================
        loop {
            match result_rx.try_recv() {
                Ok(AppResult::Converted { id, payload }) => {
                    if app.receive_result(id, payload, Instant::now()) {
                        info!(id, "Showing conversion result");
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if worker_alive {
                        error!("Worker thread disconnected!");
                        worker_alive = false;
                    }
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER
        // ========================================
        let now = Instant::now();
        terminal.draw(|frame| render(frame, app, now))?;

        // ========================================
        // 2. INPUT
        // ========================================
        match events.next() {
            Ok(event) => handle_event(app, event, &command_tx),
            Err(e) => warn!(error = ?e, "Failed to read terminal event"),
        }

        // ========================================
        // 3. UPDATE
        // ========================================
        app.tick(Instant::now());
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lazyfx::ui::events::{
        get_char_from_event, is_backspace_event, is_clear_event, is_enter_event,
        is_escape_event, is_quit_event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            info!("User requested quit");
            app.quit();
        }

        // Échap : ferme la notification, abandonne la demande en cours
        Event::Key(_) if is_escape_event(&event) => {
            debug!("User dismissed notification");
            app.dismiss(Instant::now());
        }

        // Entrée : "convertir la sélection"
        Event::Key(_) if is_enter_event(&event) => {
            let Some((id, text)) = app.submit_selection() else {
                debug!("Empty selection, ignoring");
                return;
            };

            info!(id, text = %text, "User submitted selection");
            if command_tx.send(AppCommand::Convert { id, text }).is_err() {
                error!("Worker unavailable, cannot convert");
                app.receive_result(
                    id,
                    DisplayPayload::error("Failed to convert: background worker stopped"),
                    Instant::now(),
                );
            }
        }

        Event::Key(_) if is_clear_event(&event) => app.clear_input(),

        Event::Key(_) if is_backspace_event(&event) => app.backspace(),

        Event::Key(_) => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }

        Event::Paste(text) => {
            debug!(len = text.len(), "Text pasted");
            app.paste(&text);
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    // Bracketed paste : un collage arrive en un seul événement
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;

    terminal.show_cursor()?;

    Ok(())
}
