use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver};

use crate::action::{Action, INIT_ACTION};
use crate::dispatcher::Dispatcher;
use crate::error::StoreError;
use crate::middleware::Middleware;
use crate::reducer::{BoxedReducer, Reducer, Shared};
use crate::subscription::{self, Listeners, Subscription};

/// What a store is doing right now.
///
/// A store is `Idle` between dispatches. Any dispatch attempted while it is
/// in one of the other phases is rejected with
/// [`StoreError::ReentrantDispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Idle,
    Middleware,
    Reducing,
    Notifying,
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            DispatchPhase::Idle => "idle",
            DispatchPhase::Middleware => "running middleware",
            DispatchPhase::Reducing => "reducing",
            DispatchPhase::Notifying => "notifying listeners",
        };
        f.write_str(phase)
    }
}

/// Puts the store back to idle however a dispatch ends, unwinding included
struct PhaseGuard<'a> {
    phase: &'a Cell<DispatchPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Cell<DispatchPhase>, first: DispatchPhase) -> Self {
        phase.set(first);
        Self { phase }
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(DispatchPhase::Idle);
    }
}

struct Inner<S, A> {
    root: BoxedReducer<A, S>,
    state: RefCell<Shared<S>>,
    phase: Cell<DispatchPhase>,
    listeners: Rc<RefCell<Listeners>>,
    middleware: RefCell<Vec<Box<dyn Middleware<S, A>>>>,
    dispatcher: Dispatcher<A>,
    follow_ups: Receiver<A>,
}

/// Store - owns the state tree and runs the dispatch loop
///
/// The Store follows the Redux pattern:
/// - One committed state tree, replaced (never mutated) on each dispatch
/// - Actions are dispatched to request changes
/// - A pure root reducer computes the next tree
/// - Listeners are notified synchronously after every commit
///
/// `Store` is a cheap handle; clones share the same store. Everything runs on
/// the calling thread and to completion: by the time `dispatch` returns, the
/// reducer has run, the new tree is committed and every listener has been
/// called.
///
/// # Example
/// ```rust
/// use kitchen_store::{leaf, Action, Store};
///
/// #[derive(Debug)]
/// enum Counter { Inc }
///
/// impl Action for Counter {
///     fn action_type(&self) -> &'static str { "Inc" }
/// }
///
/// let store = Store::new(leaf(|| 0u32, |n: &u32, _: &Counter| Some(n + 1))).unwrap();
///
/// let reader = store.downgrade();
/// let _subscription = store.subscribe(move || {
///     if let Some(store) = reader.upgrade() {
///         println!("count is now {}", store.state());
///     }
///     Ok(())
/// });
///
/// store.dispatch(Counter::Inc).unwrap();
/// assert_eq!(*store.state(), 1);
/// ```
pub struct Store<S, A> {
    inner: Rc<Inner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Non-owning store handle.
///
/// Listeners that need to read the store should capture one of these rather
/// than a [`Store`], which would keep the store alive through its own listener
/// list.
pub struct WeakStore<S, A> {
    inner: Weak<Inner<S, A>>,
}

impl<S, A> Clone for WeakStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, A> WeakStore<S, A> {
    pub fn upgrade(&self) -> Option<Store<S, A>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

/// Configures a [`Store`] before its initial state is built
pub struct StoreBuilder<S, A> {
    root: BoxedReducer<A, S>,
    seed: Option<Shared<S>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
}

impl<S: 'static, A: Action + 'static> StoreBuilder<S, A> {
    /// Start from a previously built tree instead of the reducers' defaults
    pub fn initial_state(mut self, seed: Shared<S>) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Append a middleware; the chain runs in the order added
    pub fn middleware(mut self, middleware: impl Middleware<S, A> + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Build the initial tree and the store.
    ///
    /// Without a seed the root reducer's default is used; a fault there is
    /// returned as [`StoreError::ReducerFault`].
    pub fn build(self) -> Result<Store<S, A>, StoreError> {
        let state = match self.seed {
            Some(seed) => {
                log::debug!("Store seeded with a supplied initial state");
                seed
            }
            None => {
                log::debug!("Building initial state ({})", INIT_ACTION);
                self.root.initial().inspect_err(|fault| {
                    log::error!("Failed to build initial state: {}", fault);
                })?
            }
        };

        Ok(Store::assemble(self.root, state, self.middleware))
    }
}

impl<S: 'static, A: Action + 'static> Store<S, A> {
    /// Start configuring a store around `root`
    pub fn builder(root: impl Reducer<A, State = S> + 'static) -> StoreBuilder<S, A> {
        StoreBuilder {
            root: Box::new(root),
            seed: None,
            middleware: Vec::new(),
        }
    }

    /// Create a store whose initial state comes from the root reducer's defaults
    pub fn new(root: impl Reducer<A, State = S> + 'static) -> Result<Self, StoreError> {
        Self::builder(root).build()
    }

    /// Create a store seeded with `initial_state`, e.g. a rehydrated tree.
    ///
    /// The root reducer's defaults are not consulted.
    pub fn with_state(root: impl Reducer<A, State = S> + 'static, initial_state: Shared<S>) -> Self {
        Self::assemble(Box::new(root), initial_state, Vec::new())
    }

    fn assemble(
        root: BoxedReducer<A, S>,
        state: Shared<S>,
        middleware: Vec<Box<dyn Middleware<S, A>>>,
    ) -> Self {
        let (action_tx, follow_ups) = mpsc::channel();

        Self {
            inner: Rc::new(Inner {
                root,
                state: RefCell::new(state),
                phase: Cell::new(DispatchPhase::Idle),
                listeners: Rc::new(RefCell::new(Listeners::default())),
                middleware: RefCell::new(middleware),
                dispatcher: Dispatcher::new(action_tx),
                follow_ups,
            }),
        }
    }

    /// The committed state tree.
    ///
    /// During notification this is already the tree produced by the dispatch
    /// being notified about.
    pub fn state(&self) -> Shared<S> {
        Shared::clone(&self.inner.state.borrow())
    }

    pub fn phase(&self) -> DispatchPhase {
        self.inner.phase.get()
    }

    /// Handle for queueing follow-up actions from listeners and middleware
    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.inner.dispatcher
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn downgrade(&self) -> WeakStore<S, A> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Register a listener, called with no arguments after every commit.
    ///
    /// Listeners run in subscription order. One subscribed while a
    /// notification is running is first called on the next dispatch.
    pub fn subscribe(
        &self,
        listener: impl Fn() -> anyhow::Result<()> + 'static,
    ) -> Subscription {
        subscription::subscribe(&self.inner.listeners, listener)
    }

    /// Dispatch an action: middleware, root reducer, commit, notify.
    ///
    /// Returns the action once every listener has been called and all
    /// follow-up actions queued through the [`Dispatcher`] have been
    /// dispatched. Errors:
    /// - [`StoreError::ReentrantDispatch`] when called from a reducer,
    ///   middleware or listener of an in-flight dispatch
    /// - [`StoreError::ReducerFault`] when the root reducer fails; nothing is
    ///   committed and listeners are not called
    /// - [`StoreError::ListenerFault`] when listeners failed; the new state is
    ///   committed
    ///
    /// Whenever a dispatch fails (a follow-up included), the follow-ups still
    /// queued are discarded, so nothing of a failed dispatch leaks into the
    /// next one.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        let outcome = self
            .dispatch_one(action)
            .and_then(|action| self.drain_follow_ups().map(|()| action));

        match &outcome {
            // the in-flight dispatch owns the queue
            Err(StoreError::ReentrantDispatch { .. }) | Ok(_) => {}
            Err(_) => self.discard_follow_ups(),
        }
        outcome
    }

    /// Turn an action creator into a function that dispatches what it creates.
    ///
    /// The returned function holds a [`WeakStore`], so it can live inside a
    /// listener. Once the store is gone it fails with
    /// [`StoreError::StoreDropped`].
    pub fn bind<P, F>(&self, creator: F) -> impl Fn(P) -> Result<A, StoreError>
    where
        F: Fn(P) -> A,
    {
        let store = self.downgrade();
        move |payload| {
            let action = creator(payload);
            match store.upgrade() {
                Some(store) => store.dispatch(action),
                None => {
                    log::warn!("Dropped {}, the store is gone", action.action_type());
                    Err(StoreError::StoreDropped {
                        action_type: action.action_type(),
                    })
                }
            }
        }
    }

    /// Subscribe to one subtree.
    ///
    /// `on_change` is called only when `selector` picks a node whose pointer
    /// differs from the one it picked last time.
    pub fn watch<T, Sel, F>(&self, selector: Sel, on_change: F) -> Subscription
    where
        T: 'static,
        Sel: Fn(&S) -> Shared<T> + 'static,
        F: Fn(&Shared<T>) -> anyhow::Result<()> + 'static,
    {
        let store = self.downgrade();
        let last = RefCell::new(selector(&*self.state()));

        self.subscribe(move || {
            let Some(store) = store.upgrade() else {
                return Ok(());
            };
            let selected = selector(&*store.state());
            if Shared::ptr_eq(&last.borrow(), &selected) {
                return Ok(());
            }
            *last.borrow_mut() = Shared::clone(&selected);
            on_change(&selected)
        })
    }

    fn dispatch_one(&self, action: A) -> Result<A, StoreError> {
        let inner = &*self.inner;

        let phase = inner.phase.get();
        if phase != DispatchPhase::Idle {
            log::warn!(
                "Rejected dispatch of {} while {}",
                action.action_type(),
                phase
            );
            return Err(StoreError::ReentrantDispatch {
                action_type: action.action_type(),
                phase,
            });
        }
        let _idle_on_exit = PhaseGuard::enter(&inner.phase, DispatchPhase::Middleware);

        let current = self.state();
        if !self.run_middleware(&action, &current) {
            log::debug!("Action {} blocked by middleware", action.action_type());
            return Ok(action);
        }

        inner.phase.set(DispatchPhase::Reducing);
        let next = inner.root.reduce(&current, &action).inspect_err(|fault| {
            log::warn!("Dispatch aborted, state unchanged: {}", fault);
        })?;

        if Shared::ptr_eq(&current, &next) {
            log::trace!("{} left the state untouched", action.action_type());
        }
        *inner.state.borrow_mut() = next;

        inner.phase.set(DispatchPhase::Notifying);
        let failures = subscription::notify(&inner.listeners);
        if !failures.is_empty() {
            return Err(StoreError::ListenerFault { failures });
        }

        Ok(action)
    }

    fn run_middleware(&self, action: &A, state: &Shared<S>) -> bool {
        let mut chain = self.inner.middleware.borrow_mut();
        chain
            .iter_mut()
            .all(|middleware| middleware.handle(action, state, &self.inner.dispatcher))
    }

    fn drain_follow_ups(&self) -> Result<(), StoreError> {
        while let Ok(action) = self.inner.follow_ups.try_recv() {
            log::debug!("Dispatching follow-up {}", action.action_type());
            self.dispatch_one(action)?;
        }
        Ok(())
    }

    fn discard_follow_ups(&self) {
        let discarded = self.inner.follow_ups.try_iter().count();
        if discarded > 0 {
            log::warn!("Discarded {} follow-up(s) queued by a failed dispatch", discarded);
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("phase", &self.inner.phase.get())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}
