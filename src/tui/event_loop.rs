use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};

use crate::debounce::Debounced;
use crate::tui::event_handlers::{KeyAction, handle_key};
use crate::tui::state::build_render_plan;
use crate::tui::theme::Theme;
use crate::tui::view;
use crate::widget::{SharedWidget, handle_input};

type TerminalType = Terminal<CrosstermBackend<Stdout>>;

const TICK: Duration = Duration::from_millis(100);

pub struct TuiApp {
    pub title: String,
    widget: SharedWidget,
    trigger: Debounced<String, Result<()>>,
    theme: Theme,
}

impl TuiApp {
    pub fn new(
        title: impl Into<String>,
        widget: SharedWidget,
        trigger: Debounced<String, Result<()>>,
        theme: Theme,
    ) -> Self {
        Self {
            title: title.into(),
            widget,
            trigger,
            theme,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        struct TuiGuard;
        impl Drop for TuiGuard {
            fn drop(&mut self) {
                let mut stdout = io::stdout();
                let _ = execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show);
                let _ = terminal::disable_raw_mode();
            }
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let _guard = TuiGuard;

        let mut term = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        term.clear()?;
        info!(theme=%self.theme.name, "tui started");
        let res = self.event_loop(&mut term).await;
        self.trigger.cancel();
        info!("tui stopped");
        res
    }

    async fn event_loop(&mut self, term: &mut TerminalType) -> Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK);
        loop {
            {
                let mut w = self.widget.lock().await;
                w.sweep_notices(Instant::now());
                let title = self.title.as_str();
                let theme = &self.theme;
                term.draw(|f| {
                    let plan = build_render_plan(title, &w, f.area().width);
                    view::render(f, &plan, theme);
                })?;
            }

            tokio::select! {
                _ = tick.tick() => {}
                maybe = events.next() => match maybe {
                    Some(Ok(Event::Key(k))) if k.kind == KeyEventKind::Press => {
                        let action = {
                            let mut w = self.widget.lock().await;
                            handle_key(&mut w, k, Instant::now())
                        };
                        match action {
                            KeyAction::Quit => return Ok(()),
                            KeyAction::Edited(text) => self.on_input(text),
                            KeyAction::Continue => {}
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                },
            }
        }
    }

    /// One input event: reschedule the refresh and let a task wait on it.
    fn on_input(&mut self, text: String) {
        let deferred = self.trigger.call(text);
        let widget = self.widget.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_input(deferred, &widget).await {
                error!("unhandled failure in search pipeline: {e:#}");
            }
        });
    }
}
