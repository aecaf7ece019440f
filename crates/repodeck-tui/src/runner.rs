// TUI event loop and terminal management
use crate::app::{App, Command, GatewayEvent};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use repodeck_core::RepositoryGateway;
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_tui(
    mut app: App,
    gateway: Arc<dyn RepositoryGateway>,
    mouse_enabled: bool,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = event_loop(&mut terminal, &mut app, &gateway, &tx, &mut rx).await;

    // Restore terminal even when the loop bailed out
    disable_raw_mode()?;
    if mouse_enabled {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    gateway: &Arc<dyn RepositoryGateway>,
    tx: &UnboundedSender<GatewayEvent>,
    rx: &mut UnboundedReceiver<GatewayEvent>,
) -> anyhow::Result<()> {
    loop {
        while let Ok(event) = rx.try_recv() {
            app.apply(event);
        }
        app.tick();

        terminal.draw(|f| crate::ui::render(f, app))?;

        if app.should_quit {
            info!("quitting");
            return Ok(());
        }

        // Poll instead of blocking on read so gateway results get drawn
        // as soon as they land
        if !event::poll(FRAME_INTERVAL)? {
            tokio::task::yield_now().await;
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                for command in app.handle_key(key) {
                    dispatch(command, app, gateway, tx);
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app.handle_scroll(true),
                MouseEventKind::ScrollUp => app.handle_scroll(false),
                _ => {}
            },
            _ => {}
        }
    }
}

fn dispatch(
    command: Command,
    app: &mut App,
    gateway: &Arc<dyn RepositoryGateway>,
    tx: &UnboundedSender<GatewayEvent>,
) {
    match command {
        Command::Search(request) => {
            let gateway = Arc::clone(gateway);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = gateway.search_repositories(&request.query).await;
                deliver(&tx, GatewayEvent::Search {
                    token: request.token,
                    result,
                });
            });
        }
        Command::LoadDetail { tab, requests } => {
            let readme_gateway = Arc::clone(gateway);
            let readme_tx = tx.clone();
            let owner = requests.owner.clone();
            let repo = requests.repo.clone();
            let readme_token = requests.readme;
            tokio::spawn(async move {
                let result = readme_gateway.fetch_documentation(&owner, &repo).await;
                deliver(&readme_tx, GatewayEvent::Readme {
                    tab,
                    token: readme_token,
                    result,
                });
            });

            let gateway = Arc::clone(gateway);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = gateway
                    .fetch_contributors(&requests.owner, &requests.repo, requests.limit)
                    .await;
                deliver(&tx, GatewayEvent::Contributors {
                    tab,
                    token: requests.contributors,
                    result,
                });
            });
        }
        Command::OpenUrl(url) => {
            if let Err(e) = open::that(&url) {
                warn!("Failed to open {}: {}", url, e);
                app.status_message = Some(format!("Failed to open browser: {}", e));
            }
        }
        Command::CopyToClipboard(text) => {
            match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
                Ok(()) => app.status_message = Some("Share link copied to clipboard".to_string()),
                Err(e) => {
                    warn!("Failed to copy to clipboard: {}", e);
                    app.status_message = Some(format!("Failed to copy: {}", e));
                }
            }
        }
    }
}

fn deliver(tx: &UnboundedSender<GatewayEvent>, event: GatewayEvent) {
    // The receiver is gone once the UI has quit
    if tx.send(event).is_err() {
        debug!("dropping gateway result after shutdown");
    }
}
