//! # Slash Commands
//!
//! Input that starts with [`COMMAND_SENTINEL`] is not chat text, it is a
//! command: `/remind 10 stand up` calls the `remind` handler with
//! `["10", "stand", "up"]`.
//!
//! Handlers are registered by name with an [`Arity`]. Everything that can go
//! wrong (unknown name, wrong argument count, a handler-level failure) comes
//! back as a [`CommandError`] whose `Display` is the one-line message shown
//! to the user. Nothing here ever panics or tears down the editor loop.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::core::content::SharedContent;
use crate::core::dispatch::DispatchQueue;
use crate::core::scheduler::{EventControl, EventScheduler};
use crate::core::transport::OutgoingMessage;

pub const COMMAND_SENTINEL: char = '/';

/// How many arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, given: usize) -> bool {
        match self {
            Arity::Exact(n) => given == n,
            Arity::AtLeast(n) => given >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, n) = match self {
            Arity::Exact(n) => ("", *n),
            Arity::AtLeast(n) => ("at least ", *n),
        };
        let noun = if n == 1 { "argument" } else { "arguments" };
        write!(f, "{prefix}{n} {noun}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    WrongArity {
        name: String,
        expected: Arity,
        given: usize,
    },
    /// Raised by a handler for a domain-level problem.
    Failed(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "Unknown command: {name}"),
            CommandError::WrongArity {
                name,
                expected,
                given,
            } => write!(f, "{COMMAND_SENTINEL}{name} takes {expected} ({given} given)"),
            CommandError::Failed(msg) => write!(f, "Problem executing command: {msg}"),
        }
    }
}

impl std::error::Error for CommandError {}

/// What a handler gets to work with besides its arguments.
pub struct CommandContext {
    /// Content of the pane that was active when the command was entered.
    pub conversation: SharedContent,
}

pub type Handler = Box<dyn Fn(&CommandContext, &[&str]) -> Result<(), CommandError> + Send + Sync>;

struct Command {
    arity: Arity,
    handler: Handler,
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous command of that name.
    pub fn register<F>(&mut self, name: &str, arity: Arity, handler: F)
    where
        F: Fn(&CommandContext, &[&str]) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        debug!("Registering command {}{} ({})", COMMAND_SENTINEL, name, arity);
        self.commands.insert(
            name.to_string(),
            Command {
                arity,
                handler: Box::new(handler),
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run a command line. `line` may or may not start with the sentinel.
    pub fn dispatch(&self, context: &CommandContext, line: &str) -> Result<(), CommandError> {
        let line = line.strip_prefix(COMMAND_SENTINEL).unwrap_or(line);
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let command = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::Unknown(name.to_string()))?;

        if !command.arity.accepts(args.len()) {
            return Err(CommandError::WrongArity {
                name: name.to_string(),
                expected: command.arity,
                given: args.len(),
            });
        }

        info!("Running command {}{} with {} arg(s)", COMMAND_SENTINEL, name, args.len());
        (command.handler)(context, &args)
    }
}

/// Whether a submitted line should be routed to the registry.
pub fn is_command(line: &str) -> bool {
    line.starts_with(COMMAND_SENTINEL)
}

/// Registry with `/quit`, `/me` and `/remind`.
pub fn builtin_commands(
    shutdown: CancellationToken,
    outgoing: DispatchQueue,
    scheduler: EventScheduler,
) -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("quit", Arity::Exact(0), move |_, _| {
        info!("Quit requested");
        shutdown.cancel();
        Ok(())
    });

    registry.register("me", Arity::AtLeast(1), move |context, args| {
        let text = format!("* {}", args.join(" "));
        outgoing
            .push(OutgoingMessage::new(text, context.conversation.clone()))
            .map_err(|e| CommandError::Failed(e.to_string()))
    });

    registry.register("remind", Arity::AtLeast(2), move |context, args| {
        let seconds: u64 = args[0]
            .parse()
            .map_err(|_| CommandError::Failed(format!("invalid delay '{}'", args[0])))?;
        let text = args[1..].join(" ");
        let conversation = context.conversation.clone();

        // The first invocation is immediate, so the reminder fires on the second.
        let mut armed = false;
        let scheduled = scheduler.schedule("remind", Duration::from_secs(seconds), move || {
            if !armed {
                armed = true;
                return EventControl::Continue;
            }
            conversation.append(format!("Reminder: {text}"));
            EventControl::Stop
        });

        match scheduled {
            Some(_) => Ok(()),
            None => Err(CommandError::Failed("shutting down".into())),
        }
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::TextContainer;
    use crate::core::dispatch;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn context() -> CommandContext {
        CommandContext {
            conversation: TextContainer::shared(10),
        }
    }

    #[test]
    fn test_dispatch_passes_whitespace_split_args() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut registry = CommandRegistry::new();
        registry.register("say", Arity::AtLeast(0), move |_, args| {
            sink.lock().unwrap().extend(args.iter().map(|a| a.to_string()));
            Ok(())
        });

        registry.dispatch(&context(), "/say  one two   three").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_unknown_command() {
        let registry = CommandRegistry::new();
        let err = registry.dispatch(&context(), "/nope 1").unwrap_err();
        assert_eq!(err, CommandError::Unknown("nope".into()));
        assert_eq!(err.to_string(), "Unknown command: nope");
    }

    #[test]
    fn test_wrong_arity_is_reported_not_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = CommandRegistry::new();
        registry.register("refresh", Arity::Exact(0), move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let err = registry.dispatch(&context(), "/refresh now").unwrap_err();
        assert_eq!(err.to_string(), "/refresh takes 0 arguments (1 given)");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        registry.dispatch(&context(), "/refresh").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_failure_message() {
        let mut registry = CommandRegistry::new();
        registry.register("fail", Arity::Exact(1), |_, args| {
            Err(CommandError::Failed(format!("cannot {}", args[0])))
        });
        let err = registry.dispatch(&context(), "/fail fly").unwrap_err();
        assert_eq!(err.to_string(), "Problem executing command: cannot fly");
    }

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::Exact(1).to_string(), "1 argument");
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2 arguments");
    }

    #[test]
    fn test_remove_and_names() {
        let mut registry = CommandRegistry::new();
        registry.register("b", Arity::Exact(0), |_, _| Ok(()));
        registry.register("a", Arity::Exact(0), |_, _| Ok(()));
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert!(!registry.contains("a"));
    }

    #[test]
    fn test_is_command() {
        assert!(is_command("/quit"));
        assert!(!is_command("hello /quit"));
    }

    #[tokio::test]
    async fn test_builtin_quit_and_me() {
        let shutdown = CancellationToken::new();
        let scheduler = EventScheduler::new(shutdown.clone());
        let (outgoing, mut receiver) = dispatch::channel();
        let registry = builtin_commands(shutdown.clone(), outgoing, scheduler);

        let ctx = context();
        registry.dispatch(&ctx, "/me waves hello").unwrap();
        let queued = receiver.recv().await.unwrap();
        assert_eq!(queued.text, "* waves hello");

        registry.dispatch(&ctx, "/quit").unwrap();
        assert!(shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn test_builtin_remind_rejects_bad_delay() {
        let shutdown = CancellationToken::new();
        let scheduler = EventScheduler::new(shutdown.clone());
        let (outgoing, _receiver) = dispatch::channel();
        let registry = builtin_commands(shutdown, outgoing, scheduler.clone());

        let err = registry.dispatch(&context(), "/remind soon tea").unwrap_err();
        assert_eq!(err.to_string(), "Problem executing command: invalid delay 'soon'");
        assert_eq!(scheduler.live_count(), 0);
    }

    #[tokio::test]
    async fn test_builtin_remind_posts_once() {
        let shutdown = CancellationToken::new();
        let scheduler = EventScheduler::new(shutdown.clone());
        let (outgoing, _receiver) = dispatch::channel();
        let registry = builtin_commands(shutdown, outgoing, scheduler.clone());
        let ctx = context();

        registry.dispatch(&ctx, "/remind 0 tea time").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(ctx.conversation.snapshot(), vec!["Reminder: tea time"]);
        assert_eq!(scheduler.running_count(), 0);
    }
}
