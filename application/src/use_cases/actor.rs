//! Single-consumer command queue in front of the lifecycle coordinator.
//!
//! Reaction events and scheduler ticks arrive concurrently but are applied
//! one at a time: every producer pushes a [`LifecycleCommand`] onto a
//! bounded queue and a single task drains it. Together with the store's
//! conditional writes this removes same-process interleavings entirely.

use crate::use_cases::lifecycle::VoteLifecycle;
use crate::ports::chat_platform::ChannelMessage;
use agora_domain::MessageId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Queue depth before producers start applying backpressure.
pub const COMMAND_QUEUE_DEPTH: usize = 64;

/// An event for the lifecycle coordinator to apply.
#[derive(Debug)]
pub enum LifecycleCommand {
    /// Support reactions changed on a debate-channel message.
    SupportReaction {
        message: ChannelMessage,
        support_count: u32,
    },
    /// Reactions changed on a message that may be an open vote.
    VoteReaction { vote_message_id: MessageId },
    /// Sweep for votes whose window has elapsed. The optional sender is
    /// signalled once the sweep completes, letting the scheduler run its
    /// ticks strictly one after another.
    CheckEndedVotes { done: Option<oneshot::Sender<()>> },
}

/// Cloneable producer handle to the lifecycle queue.
#[derive(Clone)]
pub struct LifecycleHandle {
    tx: mpsc::Sender<LifecycleCommand>,
}

impl LifecycleHandle {
    /// Enqueue a support-reaction event. Returns `false` if the lifecycle
    /// task has shut down.
    pub async fn support_reaction(&self, message: ChannelMessage, support_count: u32) -> bool {
        self.tx
            .send(LifecycleCommand::SupportReaction {
                message,
                support_count,
            })
            .await
            .is_ok()
    }

    /// Enqueue a vote-reaction event. Returns `false` if the lifecycle task
    /// has shut down.
    pub async fn vote_reaction(&self, vote_message_id: MessageId) -> bool {
        self.tx
            .send(LifecycleCommand::VoteReaction { vote_message_id })
            .await
            .is_ok()
    }

    /// Run an expiry sweep and wait for it to finish. Returns `false` if the
    /// lifecycle task has shut down.
    pub async fn check_ended_votes(&self) -> bool {
        let (done, finished) = oneshot::channel();
        if self
            .tx
            .send(LifecycleCommand::CheckEndedVotes { done: Some(done) })
            .await
            .is_err()
        {
            return false;
        }
        finished.await.is_ok()
    }
}

/// Spawn the single consumer task that owns `lifecycle`.
///
/// The task runs until every [`LifecycleHandle`] clone has been dropped.
/// Command failures are logged and never stop the loop; the next event or
/// tick is the retry mechanism.
pub fn spawn(lifecycle: VoteLifecycle) -> (LifecycleHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);

    let task = tokio::spawn(async move {
        info!("lifecycle queue started");
        while let Some(command) = rx.recv().await {
            match command {
                LifecycleCommand::SupportReaction {
                    message,
                    support_count,
                } => {
                    if let Err(e) = lifecycle
                        .handle_support_reaction(&message, support_count)
                        .await
                    {
                        error!(message = %message.id, error = %e, "support event failed");
                    }
                }
                LifecycleCommand::VoteReaction { vote_message_id } => {
                    if let Err(e) = lifecycle.handle_vote_reaction(&vote_message_id).await {
                        error!(%vote_message_id, error = %e, "vote-reaction event failed");
                    }
                }
                LifecycleCommand::CheckEndedVotes { done } => {
                    if let Err(e) = lifecycle.check_ended_votes().await {
                        error!(error = %e, "expiry sweep failed");
                    }
                    if let Some(done) = done {
                        // Receiver may have given up waiting; nothing to do.
                        let _ = done.send(());
                    }
                }
            }
        }
        debug!("all handles dropped; lifecycle queue stopped");
    });

    (LifecycleHandle { tx }, task)
}
