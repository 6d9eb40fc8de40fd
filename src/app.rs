use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::Theme;
use crate::commands::{Command, run_external};
use crate::pages::PageData;
use crate::router::{Outcome, Router};
use crate::tui::{Event, Tui};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;

/// Messages processed by the main loop, from terminal events and commands.
#[derive(Debug)]
pub enum AppMessage {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    /// A page fetch or finder search finished.
    Loaded {
        ticket: u64,
        result: Result<PageData, String>,
    },
    RegionsLoaded {
        ticket: u64,
        result: Result<Vec<String>, String>,
    },
    ShowInfo(String),
    ShowError(String),
}

pub struct App {
    router: Router,
    theme: Theme,
    should_quit: bool,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(router: Router, theme: Theme) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            router,
            theme,
            should_quit: false,
            message_tx,
            message_rx,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui)?;
            if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        info!("Exiting");
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Quit => self.message_tx.send(AppMessage::Quit)?,
            Event::Tick => self.message_tx.send(AppMessage::Tick)?,
            Event::Render => self.message_tx.send(AppMessage::Render)?,
            Event::Resize(w, h) => self.message_tx.send(AppMessage::Resize(w, h))?,
            Event::Key(key) => match self.router.handle_key(key) {
                Ok(outcome) => self.apply(outcome, tui).await?,
                Err(e) => {
                    error!(error = %e, "Key handling failed");
                    self.router.show_error(format!("{e:#}"));
                }
            },
            Event::Error(e) => warn!(error = %e, "Terminal event error"),
            Event::Init => {}
        }
        Ok(())
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        while let Ok(message) = self.message_rx.try_recv() {
            if !matches!(message, AppMessage::Tick | AppMessage::Render) {
                debug!(?message, "Handling message");
            }
            match message {
                AppMessage::Tick => self.router.tick(),
                AppMessage::Render => self.render(tui)?,
                AppMessage::Resize(w, h) => {
                    tui.resize(Rect::new(0, 0, w, h))?;
                    self.render(tui)?;
                }
                AppMessage::Quit => self.should_quit = true,
                AppMessage::Loaded { ticket, result } => self.router.on_loaded(ticket, result),
                AppMessage::RegionsLoaded { ticket, result } => {
                    self.router.on_regions_loaded(ticket, result);
                }
                AppMessage::ShowInfo(message) => self.router.show_info(message),
                AppMessage::ShowError(message) => self.router.show_error(message),
            }
        }
        Ok(())
    }

    async fn apply(&mut self, outcome: Outcome, tui: &mut Tui) -> color_eyre::Result<()> {
        match outcome {
            Outcome::Idle => {}
            Outcome::Quit => self.should_quit = true,
            Outcome::Run(commands) => {
                for command in commands {
                    self.spawn(command);
                }
            }
            Outcome::HandOff { program, content } => self.hand_off(tui, &program, &content).await?,
        }
        Ok(())
    }

    fn spawn(&self, command: Box<dyn Command>) {
        let tx = self.message_tx.clone();
        let name = command.name();
        debug!(command = %name, "Spawning command");
        tokio::spawn(async move {
            if let Err(e) = command.execute(tx.clone()).await {
                error!(command = %name, error = %e, "Command failed");
                let _ = tx.send(AppMessage::ShowError(format!("{name} failed: {e}")));
            }
        });
    }

    /// Give the terminal to an external program until it exits.
    async fn hand_off(&mut self, tui: &mut Tui, program: &str, content: &str) -> color_eyre::Result<()> {
        tui.exit()?;
        let result = run_external(program, content).await;
        tui.enter()?;
        tui.clear()?;

        match result {
            Ok(status) if status.success() => {}
            Ok(status) => self.router.show_error(format!("{program} exited with {status}")),
            Err(e) => self.router.show_error(format!("{e:#}")),
        }
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| self.router.render(frame, &self.theme))?;
        Ok(())
    }
}
