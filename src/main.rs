use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use futzer_client::{config::Config, ui::App, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Логи уходят в виджет tui-logger, а не в stdout: обычный вывод
    // ломал бы альтернативный экран терминала.
    tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .init();
    tui_logger::init_logger(log::LevelFilter::Info).ok();

    info!("Starting Futzer terminal client");
    info!("API: {}", config.api.base_url);

    let state = AppState::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(state).run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
