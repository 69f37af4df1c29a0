//! # TUI Adapter
//!
//! The ratatui-specific layer: pane layout, the modal editor, the screen
//! behind its render lock, and the session that runs them concurrently.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Startup and Teardown
//!
//! [`run`] acquires the terminal (the only fatal failure), starts the
//! session, and runs the blocking input loop on `spawn_blocking`. When the
//! loop returns, the session is torn down first and the terminal is
//! restored last, by dropping [`TerminalGuard`]. The guard also restores on
//! early returns and unwinding.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

pub mod component;
pub mod components;
pub mod editor;
pub mod event;
pub mod layout;
pub mod screen;
pub mod session;
pub mod text_wrap;

use log::{info, warn};
use std::io::stdout;
use std::sync::Arc;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tokio_util::sync::CancellationToken;

use crate::core::config::ResolvedConfig;
use crate::core::content::TextContainer;
use crate::core::transport::EchoTransport;
use crate::tui::event::TerminalEvents;
use crate::tui::screen::{Screen, ScreenError, ScreenOptions};
use crate::tui::session::Session;

/// Raw mode, alternate screen and bracketed paste for as long as it lives.
pub struct TerminalGuard {
    terminal: Option<DefaultTerminal>,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self, ScreenError> {
        let terminal = ratatui::try_init().map_err(|e| ScreenError::Backend(e.to_string()))?;
        let guard = Self {
            terminal: Some(terminal),
        };
        execute!(stdout(), EnableBracketedPaste, Show, SetCursorStyle::SteadyBlock)
            .map_err(|e| ScreenError::Backend(e.to_string()))?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(guard)
    }

    /// Hand the terminal to the screen. The modes stay until the guard drops.
    pub fn take_terminal(&mut self) -> Option<DefaultTerminal> {
        self.terminal.take()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
        info!("Terminal restored");
    }
}

/// Forward SIGINT to the shutdown token.
fn listen_for_interrupt(shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.cancelled() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!("SIGINT received, shutting down");
                    shutdown.cancel();
                }
                Err(e) => warn!("Could not listen for SIGINT: {}", e),
            }
        }
    })
}

pub async fn run(config: ResolvedConfig) -> Result<(), ScreenError> {
    let console = TextContainer::shared(config.history_length);
    console.append(format!(
        "Welcome, {}. Press Esc then :help for key bindings.",
        config.nickname
    ));

    let mut guard = TerminalGuard::enter()?;
    let terminal = guard
        .take_terminal()
        .ok_or_else(|| ScreenError::Backend("terminal already taken".into()))?;
    let screen = Screen::new(terminal, console, ScreenOptions::from(&config))?;

    let shutdown = CancellationToken::new();
    let interrupt = listen_for_interrupt(shutdown.clone());
    let transport = Arc::new(EchoTransport::new(config.nickname.clone()));
    let session = Session::start(screen, transport, shutdown.clone(), config.poll_interval);
    if session.start_clock().is_none() {
        warn!("Clock not started, scheduler already stopped");
    }

    let input = session.input_loop(TerminalEvents);
    let result = match tokio::task::spawn_blocking(move || input.run()).await {
        Ok(result) => result,
        Err(e) => Err(ScreenError::Backend(format!("input loop aborted: {e}"))),
    };

    shutdown.cancel();
    let surface = session.teardown().await;
    interrupt.abort();
    info!("Session finished, {} surface holder(s) left", surface.holders());
    drop(surface);
    drop(guard);
    result
}
