use std::env;
use std::sync::Arc;

use agentes::api::{HttpApiClient, SharedApi};
use agentes::app::App;
use agentes::config::Settings;
use agentes::event::Event;
use agentes::{logging, tui, ui};
use anyhow::{Context, Result};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use futures_util::StreamExt;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let workspace_root = env::current_dir().context("cannot determine the working directory")?;
    let settings = Settings::load(&workspace_root)?;
    logging::init(&workspace_root, &settings.logging)?;
    info!("starting against {}", settings.api.base_url);

    let client = HttpApiClient::new(&settings.api)?;
    let api: SharedApi = Arc::new(client);
    let mut app = App::new(api, workspace_root);

    let mut terminal = tui::init().context("failed to initialise the terminal")?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore().context("failed to restore the terminal")?;
    if let Err(err) = &result {
        error!("event loop aborted: {:#}", err);
    }
    info!("exiting");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut stream = EventStream::new();
    let mut interval = tokio::time::interval(app.tick_rate());

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        let event = tokio::select! {
            _ = interval.tick() => Event::Tick,
            maybe_event = stream.next() => {
                match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
                    Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => return Err(err).context("terminal input failed"),
                    None => break,
                }
            }
        };

        match event {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.handle_key(key),
            Event::Resize => terminal.autoresize()?,
        }
    }
    Ok(())
}
