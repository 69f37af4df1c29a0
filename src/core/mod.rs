//! # Core
//!
//! Everything that doesn't draw: content logs, the outgoing message queue and
//! its dispatcher, the event scheduler, slash commands and configuration.
//! It knows nothing about ratatui or crossterm.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          TUI            │
//!                    │  pane tree, editor,     │
//!                    │  render lock, input loop│
//!                    └───────────┬─────────────┘
//!                                │ Repaint / SharedContent
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  content   │      │  dispatch  │      │ scheduler  │
//!     │ line logs  │      │ queue+task │      │ timed tasks│
//!     └────────────┘      └─────┬──────┘      └────────────┘
//!                               ▼
//!                        ┌────────────┐
//!                        │ transport  │
//!                        └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`content`]: `ContentSource` and the bounded `TextContainer`
//! - [`dispatch`]: outgoing queue and the background `MessageDispatcher`
//! - [`scheduler`]: recurring, cancelable `EventScheduler`
//! - [`commands`]: `/name args…` registry
//! - [`transport`]: the send collaborator
//! - [`config`]: `~/.hermit/config.toml` loading and resolution

pub mod commands;
pub mod config;
pub mod content;
pub mod dispatch;
pub mod scheduler;
pub mod transport;
