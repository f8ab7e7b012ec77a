//! Named-event publish/subscribe
//!
//! Handlers are bound to one or more event names and run synchronously, in
//! registration order, whenever one of those names is triggered. Each
//! handler receives the emitting object. There is no unbind.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{EventError, GameError};

/// Event names used by the game
pub mod names {
    pub const INIT: &str = "init";
    pub const TICK: &str = "tick";
    pub const RESET: &str = "reset";
    pub const START: &str = "start";
    pub const SERVE: &str = "serve";
    pub const HIT: &str = "hit";
    pub const BOUNCE: &str = "bounce";
    pub const GOAL: &str = "goal";
    pub const GAME_OVER: &str = "gameOver";
    pub const SCORE_SUBMIT: &str = "scoreSubmit";
}

pub type HandlerResult = Result<(), GameError>;

/// A bound callback; receives the object that triggered the event
pub type Handler<C> = Rc<dyn Fn(&mut C) -> HandlerResult>;

/// Anything that can name the events a handler binds to
pub trait IntoEventNames {
    fn into_event_names(self) -> Result<Vec<String>, EventError>;
}

impl IntoEventNames for &str {
    fn into_event_names(self) -> Result<Vec<String>, EventError> {
        Ok(vec![self.to_owned()])
    }
}

impl IntoEventNames for String {
    fn into_event_names(self) -> Result<Vec<String>, EventError> {
        Ok(vec![self])
    }
}

impl IntoEventNames for &[&str] {
    fn into_event_names(self) -> Result<Vec<String>, EventError> {
        Ok(self.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> IntoEventNames for [&str; N] {
    fn into_event_names(self) -> Result<Vec<String>, EventError> {
        self.as_slice().into_event_names()
    }
}

impl IntoEventNames for Vec<String> {
    fn into_event_names(self) -> Result<Vec<String>, EventError> {
        Ok(self)
    }
}

/// Untyped names, e.g. from a settings file. Only a string or an array of
/// strings is accepted.
impl IntoEventNames for &Value {
    fn into_event_names(self) -> Result<Vec<String>, EventError> {
        match self {
            Value::String(name) => Ok(vec![name.clone()]),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_str()
                        .map(str::to_owned)
                        .ok_or(EventError::NonStringName {
                            index,
                            found: json_kind(item),
                        })
                })
                .collect(),
            other => Err(EventError::InvalidNames {
                found: json_kind(other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Registry of handlers keyed by event name
pub struct EventBus<C> {
    handlers: HashMap<String, Vec<Handler<C>>>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self
            .handlers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every name in `names`.
    ///
    /// All names are validated before anything is registered, so a failed
    /// call leaves the bus untouched.
    pub fn bind<N, F>(&mut self, names: N, handler: F) -> Result<(), EventError>
    where
        N: IntoEventNames,
        F: Fn(&mut C) -> HandlerResult + 'static,
    {
        let names = names.into_event_names()?;
        let handler: Handler<C> = Rc::new(handler);
        for name in names {
            self.handlers
                .entry(name)
                .or_default()
                .push(Rc::clone(&handler));
        }
        Ok(())
    }

    /// Handlers bound to `name`, in dispatch order
    pub fn handlers(&self, name: &str) -> Vec<Handler<C>> {
        self.handlers.get(name).cloned().unwrap_or_default()
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.handlers.get(name).map_or(0, Vec::len)
    }
}

/// An object that owns an [`EventBus`] over itself and can trigger its events
pub trait Bindable: Sized + 'static {
    fn event_bus(&self) -> &EventBus<Self>;
    fn event_bus_mut(&mut self) -> &mut EventBus<Self>;

    fn bind<N, F>(&mut self, names: N, handler: F) -> Result<(), EventError>
    where
        N: IntoEventNames,
        F: Fn(&mut Self) -> HandlerResult + 'static,
    {
        self.event_bus_mut().bind(names, handler)
    }

    /// Run every handler bound to `name`, in registration order.
    ///
    /// The first failing handler aborts the remaining ones and its error is
    /// returned. Unbound names are a no-op.
    fn trigger(&mut self, name: &str) -> HandlerResult {
        for handler in self.event_bus().handlers(name) {
            handler(&mut *self)?;
        }
        Ok(())
    }
}
