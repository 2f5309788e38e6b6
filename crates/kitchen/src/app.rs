//! Wires config, reducers and listeners into a running kitchen

use std::cell::RefCell;
use std::io::Write;

use anyhow::Context;
use kitchen_store::{LoggingMiddleware, Shared, Store, Subscription};

use crate::actions::KitchenAction;
use crate::commands::{self, Command, HELP};
use crate::config::Config;
use crate::reducers::{kitchen_reducer, occupancy_reducer};
use crate::state::Kitchen;

pub type KitchenStore = Store<Kitchen, KitchenAction>;

/// Whether the input loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Build the store, seeded from the config when it carries a `[seed]`
pub fn build_store(config: &Config) -> anyhow::Result<KitchenStore> {
    let mut builder = Store::builder(kitchen_reducer::reducer(config.capacity))
        .middleware(LoggingMiddleware::new());

    if let Some(seed) = &config.seed {
        occupancy_reducer::validate(&seed.occupied_by, config.capacity)
            .map_err(anyhow::Error::msg)
            .context("Invalid [seed] in config")?;
        log::info!("Starting from configured kitchen: {}", seed);
        builder = builder.initial_state(Shared::new(seed.clone()));
    }

    builder.build().context("Failed to set up the kitchen")
}

/// Subscribe the listeners the config asks for.
///
/// The returned subscriptions stay active for as long as the store lives.
pub fn install_listeners(store: &KitchenStore, config: &Config) -> Vec<Subscription> {
    let mut subscriptions = Vec::new();

    if config.echo_state {
        subscriptions.push(echo_changes(store));
    }
    if config.auto_power_off {
        subscriptions.push(power_off_when_empty(store));
    }

    subscriptions
}

/// Print the kitchen to stdout whenever a dispatch changed it
fn echo_changes(store: &KitchenStore) -> Subscription {
    let weak = store.downgrade();
    let last = RefCell::new(store.state());

    store.subscribe(move || {
        let Some(store) = weak.upgrade() else {
            return Ok(());
        };
        let current = store.state();
        if Shared::ptr_eq(&last.borrow(), &current) {
            return Ok(());
        }
        *last.borrow_mut() = Shared::clone(&current);

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", current).context("Failed to print kitchen")
    })
}

/// Queue `TurnedAllElectricalOff` once the last person has left
fn power_off_when_empty(store: &KitchenStore) -> Subscription {
    let dispatcher = store.dispatcher().clone();

    store.watch(
        |kitchen: &Kitchen| Shared::clone(&kitchen.occupied_by),
        move |occupants| {
            if occupants.is_empty() {
                log::info!("Kitchen is empty, switching everything off");
                dispatcher.dispatch(KitchenAction::TurnedAllElectricalOff);
            }
            Ok(())
        },
    )
}

/// Run one line of input against the store.
///
/// Errors are meant to be reported to the user; the store stays usable.
pub fn handle_line(
    store: &KitchenStore,
    line: &str,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    let Some(command) = commands::parse(line)? else {
        return Ok(Flow::Continue);
    };

    match command {
        Command::Dispatch(action) => {
            store.dispatch(action)?;
        }
        Command::ShowState => writeln!(out, "{}", store.state())?,
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
