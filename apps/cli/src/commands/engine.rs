//! Interactive engine lock/unlock.

use anyhow::{bail, Result};
use clap::Args;
use ivss_client::ServiceContext;
use ivss_core::engine::{CredentialCandidates, EngineGate, EngineState, ToggleOutcome};
use ivss_core::notifications::{DeviceEvent, NotificationFeed};

use super::{is_yes, prompt_line};

#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Start with the engine locked
    #[arg(long)]
    pub locked: bool,

    /// Device event to record before the prompt (repeatable), e.g.
    /// `proximity_alert` or `wear_device_connected`
    #[arg(long = "event")]
    pub events: Vec<DeviceEvent>,
}

/// Feed holding `events` in the order they were reported.
fn feed_with_events(events: &[DeviceEvent]) -> NotificationFeed {
    let mut feed = NotificationFeed::new();
    for event in events {
        feed.push_event(*event);
    }
    feed
}

fn describe(state: EngineState) -> &'static str {
    if state.is_blocked {
        "locked"
    } else {
        "unlocked"
    }
}

pub fn run(ctx: &ServiceContext, args: &EngineArgs) -> Result<()> {
    let record = ctx.registrations().load();
    let cached_username = ctx.session().username();
    let candidates = CredentialCandidates::from_sources(record.as_ref(), cached_username.as_deref());
    if candidates.is_empty() {
        bail!("No credentials on this device. Register or sign in first.");
    }

    let mut gate = EngineGate::new(EngineState {
        is_blocked: args.locked,
    });
    let mut feed = feed_with_events(&args.events);
    for notification in feed.items().iter().rev() {
        println!("{}: {}", notification.title, notification.message);
    }

    loop {
        println!("Engine is {}", describe(gate.state()));
        let entered = match prompt_line("Password (empty to quit): ")? {
            Some(entered) if !entered.is_empty() => entered,
            _ => break,
        };
        gate.set_credential(entered);

        let pending = match gate.request_toggle(&candidates) {
            Ok(pending) => pending,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let answer = prompt_line(&format!("{} [y/N] ", pending.prompt()))?;
        let confirmed = answer.as_deref().is_some_and(is_yes);
        let action = pending.action();

        match gate.resolve(pending, confirmed) {
            ToggleOutcome::Committed(_) => {
                let notification = feed.push_engine_action(action);
                println!("{}: {}", notification.title, notification.message);
            }
            ToggleOutcome::Cancelled => println!("Cancelled"),
            ToggleOutcome::Stale => println!("Engine state changed, try again"),
        }
    }

    if !feed.is_empty() {
        println!("Notifications:");
        for notification in feed.items() {
            println!(
                "  #{} {} {}: {}",
                notification.id,
                notification.time.format("%H:%M:%S"),
                notification.title,
                notification.message
            );
        }
    }
    Ok(())
}
