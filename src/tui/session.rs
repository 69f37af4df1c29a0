//! # Session
//!
//! Wires the concurrent pieces together around one [`RenderLock`]:
//!
//! ```text
//!   foreground (spawn_blocking)        background (tokio tasks)
//!   ───────────────────────────        ────────────────────────
//!   InputLoop                          MessageDispatcher
//!     next_event(poll) ── no lock        recv(poll) ── no lock
//!     lock ─► editor / tree ─► repaint   lock ─► repaint
//!                                      scheduled events (clock, /remind)
//!                                        lock ─► repaint
//! ```
//!
//! Nobody holds the render lock while waiting: the input loop polls for a
//! key with the lock released and only takes it to apply the key, or on a
//! timeout to repaint whatever the background changed.
//!
//! ## Shutdown
//!
//! The shutdown [`CancellationToken`] is the running flag. `/quit`, `:q`,
//! Ctrl-C and SIGINT all cancel it. [`Session::teardown`] then
//!
//! 1. cancels every scheduled event under the events lock and awaits them
//! 2. awaits the dispatcher
//!
//! and hands back the render lock, which by then has no other holder. Only
//! after that may the caller restore the terminal.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};
use ratatui::backend::Backend;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::commands::{CommandContext, CommandRegistry, builtin_commands, is_command};
use crate::core::dispatch::{self, DispatchQueue, MessageDispatcher};
use crate::core::scheduler::{EventControl, EventId, EventScheduler};
use crate::core::transport::{OutgoingMessage, Transport};
use crate::tui::component::EventHandler;
use crate::tui::editor::EditorAction;
use crate::tui::event::{EventSource, TuiEvent};
use crate::tui::screen::{Flow, RenderLock, Screen, ScreenError};
use crate::tui::text_wrap::sanitize_input;

/// How often the clock event wakes up.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

pub struct Session<B: Backend> {
    surface: RenderLock<B>,
    shutdown: CancellationToken,
    scheduler: EventScheduler,
    outgoing: DispatchQueue,
    dispatcher: JoinHandle<()>,
    poll_interval: Duration,
}

impl<B: Backend + Send + 'static> Session<B> {
    /// Put `screen` behind the render lock and start the dispatcher.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(
        screen: Screen<B>,
        transport: Arc<dyn Transport>,
        shutdown: CancellationToken,
        poll_interval: Duration,
    ) -> Self {
        let surface = RenderLock::new(screen);
        let scheduler = EventScheduler::new(shutdown.clone());
        let (outgoing, receiver) = dispatch::channel();
        let dispatcher = MessageDispatcher::new(
            receiver,
            transport,
            Arc::new(surface.clone()),
            scheduler.clone(),
            shutdown.clone(),
            poll_interval,
        )
        .spawn();
        info!("Session started (poll={:?})", poll_interval);

        Self {
            surface,
            shutdown,
            scheduler,
            outgoing,
            dispatcher,
            poll_interval,
        }
    }

    pub fn surface(&self) -> &RenderLock<B> {
        &self.surface
    }

    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    pub fn outgoing(&self) -> DispatchQueue {
        self.outgoing.clone()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Schedule the status-bar clock. It repaints only when the shown minute changes.
    pub fn start_clock(&self) -> Option<EventId> {
        let surface = self.surface.clone();
        self.scheduler.schedule("clock", CLOCK_PERIOD, move || {
            let now = Local::now().format("%H:%M").to_string();
            let mut screen = surface.lock();
            if screen.set_clock(now) {
                if let Err(e) = screen.repaint() {
                    warn!("Clock repaint failed: {}", e);
                }
            }
            EventControl::Continue
        })
    }

    /// The foreground loop reading from `events`, with the built-in commands.
    pub fn input_loop<E: EventSource>(&self, events: E) -> InputLoop<B, E> {
        let registry = builtin_commands(
            self.shutdown.clone(),
            self.outgoing.clone(),
            self.scheduler.clone(),
        );
        InputLoop {
            surface: self.surface.clone(),
            events,
            registry,
            outgoing: self.outgoing.clone(),
            shutdown: self.shutdown.clone(),
            poll_interval: self.poll_interval,
        }
    }

    /// Stop everything that can touch the surface and return it.
    ///
    /// Call after the input loop has returned. When this resolves, no event
    /// task and no dispatcher is alive.
    pub async fn teardown(self) -> RenderLock<B> {
        info!("Session teardown");
        self.shutdown.cancel();
        self.scheduler.shutdown().await;
        if let Err(e) = self.dispatcher.await {
            warn!("Dispatcher ended abnormally: {}", e);
        }
        debug!(
            "Teardown done: {} live event(s), {} surface holder(s)",
            self.scheduler.live_count(),
            self.surface.holders()
        );
        self.surface
    }
}

/// The foreground editor loop. Blocking; run it on `spawn_blocking`.
pub struct InputLoop<B: Backend, E> {
    surface: RenderLock<B>,
    events: E,
    registry: CommandRegistry,
    outgoing: DispatchQueue,
    shutdown: CancellationToken,
    poll_interval: Duration,
}

impl<B: Backend, E: EventSource> InputLoop<B, E> {
    /// Replace or extend the slash commands.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Run until shutdown is requested.
    ///
    /// A shutdown noticed at a poll timeout is a normal return. Only a
    /// broken terminal ends the loop with an error.
    pub fn run(mut self) -> Result<(), ScreenError> {
        self.surface.lock().repaint()?;
        info!("Input loop started");

        while !self.shutdown.is_cancelled() {
            match self.events.next_event(self.poll_interval)? {
                Some(event) => {
                    if self.handle(event)? == Flow::Quit {
                        info!("Input loop asked to quit");
                        self.shutdown.cancel();
                    }
                }
                None => {
                    if self.shutdown.is_cancelled() {
                        break;
                    }
                    let mut screen = self.surface.lock();
                    if screen.take_changed() {
                        screen.repaint()?;
                    }
                }
            }
        }

        info!("Input loop stopped");
        Ok(())
    }

    /// Apply one event under the render lock.
    fn handle(&mut self, event: TuiEvent) -> Result<Flow, ScreenError> {
        let mut screen = self.surface.lock();
        let action = match &event {
            TuiEvent::Interrupt => return Ok(Flow::Quit),
            TuiEvent::Resize(width, height) => {
                screen.handle_resize(*width, *height)?;
                return Ok(Flow::Continue);
            }
            TuiEvent::Key(_) | TuiEvent::Paste(_) => screen.editor_mut().handle_event(&event),
        };

        let flow = match action {
            None | Some(EditorAction::None) => return Ok(Flow::Continue),
            Some(EditorAction::Redraw) => Flow::Continue,
            Some(EditorAction::Submit(line)) => {
                self.submit(&mut screen, &line);
                Flow::Continue
            }
            Some(EditorAction::Command(command)) => screen.execute(command),
        };
        screen.repaint()?;
        Ok(flow)
    }

    /// Route a finished line: slash commands to the registry, anything else
    /// to the dispatch queue tagged with the active pane's content.
    fn submit(&self, screen: &mut Screen<B>, line: &str) {
        let line = sanitize_input(line);
        if line.is_empty() {
            return;
        }
        let conversation = screen.active_content();

        if is_command(&line) {
            let context = CommandContext {
                conversation: conversation.clone(),
            };
            if let Err(e) = self.registry.dispatch(&context, &line) {
                debug!("Command '{}' failed: {}", line, e);
                conversation.append(format!("System: {e}"));
            }
            return;
        }

        if let Err(e) = self.outgoing.push(OutgoingMessage::new(line, conversation.clone())) {
            warn!("Could not queue message: {}", e);
            conversation.append(format!("System: {e}"));
        }
    }
}
