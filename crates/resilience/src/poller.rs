//! Background polling shared by the health checker and resource monitor.
//!
//! A component keeps a [`PollerSlot`] under its own lock. `claim` hands out
//! a child [`Context`] for the new poller, and the poller loop runs
//! [`run_every`] on it until that context is done.

use bulwark_core::Context;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Tracks the single background poller a component may own
#[derive(Debug, Default)]
pub(crate) struct PollerSlot {
    active: Option<ActivePoller>,
    next_id: u64,
}

#[derive(Debug)]
struct ActivePoller {
    id: u64,
    ctx: Context,
}

impl PollerSlot {
    /// Reserve the slot for a new poller, or `None` if one is running
    pub fn claim(&mut self, parent: &Context) -> Option<(u64, Context)> {
        if self.is_running() {
            return None;
        }
        self.next_id = self.next_id.wrapping_add(1);
        let ctx = parent.with_cancel();
        self.active = Some(ActivePoller {
            id: self.next_id,
            ctx: ctx.clone(),
        });
        Some((self.next_id, ctx))
    }

    /// Clear the slot if it still belongs to poller `id`
    pub fn release(&mut self, id: u64) {
        if self.active.as_ref().is_some_and(|active| active.id == id) {
            self.active = None;
        }
    }

    /// Cancel the running poller; returns whether one was running
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.ctx.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.ctx.is_done())
    }
}

/// Run `tick` immediately and then every `period` until `ctx` is done
///
/// The context is re-checked after every timer wake, so no tick starts once
/// cancellation has been observed.
pub(crate) async fn run_every<F, Fut>(ctx: &Context, period: Duration, mut tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = ctx.done() => break,
            _ = ticker.tick() => {
                if ctx.is_done() {
                    break;
                }
                tick().await;
            }
        }
    }
}
