//! Local event emission with tracked, bulk-cancellable subscriptions.
//!
//! Three pieces live here:
//! - [`Emitter`] – the emission primitive: a dispatcher table mapping an event
//!   name to the ordered list of handlers subscribed to it.
//! - [`MessageBus`] – a single [`Emitter`] shared by every owner in the
//!   session. Anything published on it is visible to all of its subscribers.
//! - [`ListenerRegistry`] – one per owner (a level, the game controller). It
//!   owns a private [`Emitter`], remembers every [`Listener`] it hands out and
//!   can cancel all of them at once.
//!
//! Handlers run synchronously, in subscription order, on the thread that
//! emits. Everything here is single-threaded (`Rc`/`RefCell`).
//!
//! # Use after destroy
//!
//! Once [`ListenerRegistry::destroy`] has run, the registry is inert:
//! subscribing returns a handle the registry does not know about, and
//! `emit`, `emit_global` and `off` do nothing. Each such call logs a warning.
//!
//! # Example
//!
//! ```ignore
//! let bus = MessageBus::new();
//! let mut registry = ListenerRegistry::new(bus.clone());
//! let a = registry.on("x", |v: &i32| println!("a got {v}"));
//! registry.on("x", |v: &i32| println!("b got {v}"));
//! registry.off(&a);
//! registry.emit("x", 1); // only "b got 1"
//! ```

use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Boxed event handler. Receives the payload by reference.
pub type Handler<T> = Box<dyn FnMut(&T)>;

struct Slot<T> {
    id: u64,
    once: bool,
    handler: Handler<T>,
}

/// Dispatcher table: event name → ordered handler list.
pub struct Emitter<T> {
    slots: FxHashMap<String, Vec<Slot<T>>>,
    next_id: u64,
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Emitter<T> {
    /// Create an emitter with no subscriptions.
    pub fn new() -> Self {
        Emitter {
            slots: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Subscribe a persistent handler. Returns the subscription id.
    pub fn on(&mut self, event: &str, handler: impl FnMut(&T) + 'static) -> u64 {
        self.add(event, false, Box::new(handler))
    }

    /// Subscribe a handler that is dropped after its first invocation.
    pub fn once(&mut self, event: &str, handler: impl FnMut(&T) + 'static) -> u64 {
        self.add(event, true, Box::new(handler))
    }

    fn add(&mut self, event: &str, once: bool, handler: Handler<T>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.slots
            .entry(event.to_string())
            .or_default()
            .push(Slot { id, once, handler });
        id
    }

    /// Remove one subscription. Returns `false` if it was not present.
    pub fn off(&mut self, event: &str, id: u64) -> bool {
        let Some(slots) = self.slots.get_mut(event) else {
            return false;
        };
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        let removed = slots.len() != before;
        if slots.is_empty() {
            self.slots.remove(event);
        }
        removed
    }

    /// Whether the subscription `id` on `event` is still active.
    pub fn contains(&self, event: &str, id: u64) -> bool {
        self.slots
            .get(event)
            .is_some_and(|slots| slots.iter().any(|slot| slot.id == id))
    }

    /// Invoke every handler subscribed to `event`, in subscription order.
    ///
    /// One-shot handlers are removed after the call. Returns the ids of the
    /// one-shot subscriptions that fired.
    pub fn emit(&mut self, event: &str, data: &T) -> Vec<u64> {
        let Some(slots) = self.slots.get_mut(event) else {
            return Vec::new();
        };
        let mut fired = Vec::new();
        for slot in slots.iter_mut() {
            (slot.handler)(data);
            if slot.once {
                fired.push(slot.id);
            }
        }
        if !fired.is_empty() {
            slots.retain(|slot| !slot.once);
            if slots.is_empty() {
                self.slots.remove(event);
            }
        }
        fired
    }

    /// Drop every subscription.
    pub fn remove_all(&mut self) {
        self.slots.clear();
    }

    /// Number of active handlers for `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.slots.get(event).map_or(0, Vec::len)
    }
}

/// Session-wide message bus shared by every [`ListenerRegistry`].
///
/// Cloning is cheap and yields a handle to the same bus.
pub struct MessageBus<T>(Rc<RefCell<Emitter<T>>>);

impl<T> Clone for MessageBus<T> {
    fn clone(&self) -> Self {
        MessageBus(Rc::clone(&self.0))
    }
}

impl<T> Default for MessageBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MessageBus<T> {
    pub fn new() -> Self {
        MessageBus(Rc::new(RefCell::new(Emitter::new())))
    }

    /// Publish `data` to every bus subscriber of `event`.
    ///
    /// Publishing from inside a bus handler is refused: the bus is already
    /// dispatching and the message is dropped with a warning.
    pub fn emit(&self, event: &str, data: &T) {
        match self.0.try_borrow_mut() {
            Ok(mut emitter) => {
                emitter.emit(event, data);
            }
            Err(_) => warn!("MessageBus: re-entrant emit of '{}' dropped", event),
        }
    }

    /// Subscribe a persistent handler on the bus. Returns the subscription id.
    pub fn on(&self, event: &str, handler: impl FnMut(&T) + 'static) -> Option<u64> {
        match self.0.try_borrow_mut() {
            Ok(mut emitter) => Some(emitter.on(event, handler)),
            Err(_) => {
                warn!("MessageBus: cannot subscribe to '{}' while dispatching", event);
                None
            }
        }
    }

    /// Remove a bus subscription. Returns `false` if it was not present.
    pub fn off(&self, event: &str, id: u64) -> bool {
        match self.0.try_borrow_mut() {
            Ok(mut emitter) => emitter.off(event, id),
            Err(_) => {
                warn!("MessageBus: cannot unsubscribe from '{}' while dispatching", event);
                false
            }
        }
    }

    /// Number of bus handlers for `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.0
            .try_borrow()
            .map(|emitter| emitter.handler_count(event))
            .unwrap_or(0)
    }
}

/// Which emitter a [`Listener`] is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The registry's private emitter.
    Local,
    /// The shared [`MessageBus`].
    Global,
}

/// Handle for one subscription created through a [`ListenerRegistry`].
///
/// Only the registry that issued a handle can cancel it; passing it to any
/// other registry is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Listener {
    event: String,
    id: u64,
    scope: Scope,
    owner: u64,
}

impl Listener {
    /// Emitter the subscription lives on.
    pub fn scope(&self) -> Scope {
        self.scope
    }
}

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Per-owner subscription registry with guaranteed bulk cancellation.
pub struct ListenerRegistry<T> {
    id: u64,
    local: Option<Emitter<T>>,
    listeners: Vec<Listener>,
    bus: MessageBus<T>,
}

impl<T> ListenerRegistry<T> {
    /// Create a registry publishing globally on `bus`.
    pub fn new(bus: MessageBus<T>) -> Self {
        ListenerRegistry {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            local: Some(Emitter::new()),
            listeners: Vec::new(),
            bus,
        }
    }

    /// Publish on the session-wide bus.
    pub fn emit_global(&self, event: &str, data: T) {
        if self.local.is_none() {
            warn!("emit_global('{}') on a destroyed registry ignored", event);
            return;
        }
        self.bus.emit(event, &data);
    }

    /// Publish to this registry's own subscribers only.
    pub fn emit(&mut self, event: &str, data: T) {
        let Some(local) = self.local.as_mut() else {
            warn!("emit('{}') on a destroyed registry ignored", event);
            return;
        };
        let fired = local.emit(event, &data);
        if !fired.is_empty() {
            self.listeners
                .retain(|l| !(l.scope == Scope::Local && fired.contains(&l.id)));
        }
    }

    /// Subscribe a persistent local handler.
    pub fn on(&mut self, event: &str, handler: impl FnMut(&T) + 'static) -> Listener {
        self.subscribe(event, false, handler)
    }

    /// Subscribe a local handler that runs at most once.
    pub fn once(&mut self, event: &str, handler: impl FnMut(&T) + 'static) -> Listener {
        self.subscribe(event, true, handler)
    }

    fn subscribe(
        &mut self,
        event: &str,
        once: bool,
        handler: impl FnMut(&T) + 'static,
    ) -> Listener {
        let Some(local) = self.local.as_mut() else {
            warn!("subscribing to '{}' on a destroyed registry ignored", event);
            return self.inert(event, Scope::Local);
        };
        let id = if once {
            local.once(event, handler)
        } else {
            local.on(event, handler)
        };
        self.track(event, id, Scope::Local)
    }

    /// Subscribe to the shared bus. The subscription is cancelled together
    /// with this registry's local ones.
    pub fn on_global(&mut self, event: &str, handler: impl FnMut(&T) + 'static) -> Listener {
        if self.local.is_none() {
            warn!("subscribing to global '{}' on a destroyed registry ignored", event);
            return self.inert(event, Scope::Global);
        }
        match self.bus.on(event, handler) {
            Some(id) => self.track(event, id, Scope::Global),
            None => self.inert(event, Scope::Global),
        }
    }

    fn track(&mut self, event: &str, id: u64, scope: Scope) -> Listener {
        let listener = Listener {
            event: event.to_string(),
            id,
            scope,
            owner: self.id,
        };
        self.listeners.push(listener.clone());
        listener
    }

    // id 0 is never handed out by an Emitter
    fn inert(&self, event: &str, scope: Scope) -> Listener {
        Listener {
            event: event.to_string(),
            id: 0,
            scope,
            owner: self.id,
        }
    }

    /// Cancel one subscription. Unknown handles are ignored.
    pub fn off(&mut self, listener: &Listener) {
        if listener.owner != self.id {
            return;
        }
        let Some(index) = self.listeners.iter().position(|l| l == listener) else {
            return;
        };
        let listener = self.listeners.remove(index);
        self.cancel(&listener);
    }

    fn cancel(&mut self, listener: &Listener) {
        match listener.scope {
            Scope::Local => {
                if let Some(local) = self.local.as_mut() {
                    local.off(&listener.event, listener.id);
                }
            }
            Scope::Global => {
                self.bus.off(&listener.event, listener.id);
            }
        }
    }

    /// Cancel every subscription this registry has handed out.
    pub fn remove_all_listeners(&mut self) {
        let listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter() {
            self.cancel(listener);
        }
        if let Some(local) = self.local.as_mut() {
            local.remove_all();
        }
        debug!("registry {}: removed {} listeners", self.id, listeners.len());
    }

    /// Cancel everything and release the local emitter. Idempotent.
    pub fn destroy(&mut self) {
        if self.local.is_none() {
            return;
        }
        self.remove_all_listeners();
        self.local = None;
        debug!("registry {} destroyed", self.id);
    }

    /// Whether [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.local.is_none()
    }

    /// Number of live subscriptions tracked by this registry.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Handle to the bus this registry publishes on.
    pub fn bus(&self) -> &MessageBus<T> {
        &self.bus
    }
}

impl<T> Drop for ListenerRegistry<T> {
    fn drop(&mut self) {
        // global subscriptions outlive the registry otherwise
        self.destroy();
    }
}
