//! Staged rendering of one view activation.
//!
//! Every activation gets a fresh [`RenderToken`]. Starting a new activation
//! withdraws all timers of the previous one and forgets its token; any task
//! that still surfaces with an old token is dropped by the liveness check in
//! [`RenderScheduler::pop_due`] before it can produce a visible effect.

use foundation::ids::{RenderToken, TokenMint};
use foundation::time::Millis;
use formats::Node;
use runtime::timer_queue::{TimerId, TimerQueue};
use tracing::{debug, trace};

use crate::config::StaggerConfig;
use crate::view::ViewName;

/// One deferred draw: a node's marker and its arc from the hub.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedInsertion {
    pub node: Node,
    /// Position in the activation's node sequence.
    pub index: usize,
    /// Scheduled fire time relative to activation start.
    pub offset_ms: u64,
    pub token: RenderToken,
}

#[derive(Debug, Clone)]
enum Task {
    Settle { token: RenderToken },
    Insert(StagedInsertion),
}

impl Task {
    fn token(&self) -> RenderToken {
        match self {
            Task::Settle { token } => *token,
            Task::Insert(ins) => ins.token,
        }
    }
}

/// Work handed back to the controller when its timer fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Due {
    /// The surface has had its tick to settle; draw the hub and stage nodes.
    Settle { token: RenderToken, view: ViewName },
    Insert(StagedInsertion),
}

#[derive(Debug)]
struct Activation {
    token: RenderToken,
    view: ViewName,
    started_at: Millis,
    nodes: Vec<Node>,
    staged: bool,
}

#[derive(Debug)]
pub struct RenderScheduler {
    stagger: StaggerConfig,
    mint: TokenMint,
    live: Option<Activation>,
    timers: TimerQueue<Task>,
    pending: Vec<TimerId>,
    discarded: u64,
}

impl RenderScheduler {
    pub fn new(stagger: StaggerConfig) -> Self {
        Self {
            stagger,
            mint: TokenMint::new(),
            live: None,
            timers: TimerQueue::new(),
            pending: Vec::new(),
            discarded: 0,
        }
    }

    pub fn stagger(&self) -> &StaggerConfig {
        &self.stagger
    }

    pub fn live_token(&self) -> Option<RenderToken> {
        self.live.as_ref().map(|a| a.token)
    }

    pub fn live_view(&self) -> Option<ViewName> {
        self.live.as_ref().map(|a| a.view)
    }

    pub fn is_live(&self, token: RenderToken) -> bool {
        self.live_token() == Some(token)
    }

    /// Timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Stale tasks dropped by the liveness check so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// The live activation has staged its insertions and all of them fired.
    pub fn is_complete(&self) -> bool {
        self.live.as_ref().is_some_and(|a| a.staged) && self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// Invalidates the live activation and withdraws its pending timers.
    ///
    /// Returns the number of timers withdrawn.
    pub fn cancel(&mut self) -> usize {
        let withdrawn = self.timers.cancel_all(self.pending.drain(..));
        if let Some(old) = self.live.take() {
            debug!(token = %old.token, view = %old.view, withdrawn, "activation cancelled");
        }
        withdrawn
    }

    /// Starts a new activation for `view` showing `nodes`.
    ///
    /// Any previous activation is cancelled first. Nothing is staged yet: a
    /// settle task fires after `settle_ms`, and the controller then calls
    /// [`stage_insertions`](Self::stage_insertions).
    pub fn begin_activation(&mut self, view: ViewName, nodes: Vec<Node>, now: Millis) -> RenderToken {
        self.cancel();

        let token = self.mint.mint();
        debug!(%token, %view, nodes = nodes.len(), "activation started");
        self.live = Some(Activation {
            token,
            view,
            started_at: now,
            nodes,
            staged: false,
        });

        let id = self
            .timers
            .schedule(now.after(self.stagger.settle_ms), Task::Settle { token });
        self.pending.push(id);
        token
    }

    /// Schedules one insertion per node of the live activation, the first at
    /// `now` and each following one `step_ms` later.
    ///
    /// Returns the number staged; zero if `token` is stale or already staged.
    pub fn stage_insertions(&mut self, token: RenderToken, now: Millis) -> usize {
        let Some(activation) = self.live.as_mut().filter(|a| a.token == token) else {
            return 0;
        };
        if activation.staged {
            return 0;
        }
        activation.staged = true;

        let step = self.stagger.step_ms(activation.nodes.len());
        let base = now.since(activation.started_at);
        for (index, node) in activation.nodes.iter().enumerate() {
            let delay = index as u64 * step;
            let ins = StagedInsertion {
                node: node.clone(),
                index,
                offset_ms: base + delay,
                token,
            };
            let id = self.timers.schedule(now.after(delay), Task::Insert(ins));
            self.pending.push(id);
        }

        debug!(%token, staged = activation.nodes.len(), step_ms = step, "insertions staged");
        activation.nodes.len()
    }

    /// Pops the next due task of the live activation, with its due time.
    ///
    /// Tasks carrying a superseded token are discarded here and never
    /// returned.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, Due)> {
        loop {
            let (id, at, task) = self.timers.pop_due(now)?;
            self.pending.retain(|p| *p != id);

            let token = task.token();
            let Some(live) = self.live.as_ref().filter(|a| a.token == token) else {
                self.discarded += 1;
                trace!(%token, %at, "discarded stale task");
                continue;
            };

            let due = match task {
                Task::Settle { token } => Due::Settle {
                    token,
                    view: live.view,
                },
                Task::Insert(ins) => Due::Insert(ins),
            };
            return Some((at, due));
        }
    }
}
