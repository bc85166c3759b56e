//! Status reporting back to the command origin

use crate::command::{CommandId, DispatchStatus};
use crate::rpc;
use crate::transport::CommandTransport;
use std::sync::Arc;
use tracing::error;

/// Reports command lifecycle status to the origin over the transport's RPC
/// surface.
///
/// Every notification is fire-and-report: a transport error is logged and
/// swallowed, never re-raised, and never changes the dispatch outcome
/// already decided. Delivery is the transport's concern, not dispatch logic.
pub struct StatusReporter {
    transport: Arc<dyn CommandTransport>,
}

impl StatusReporter {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self { transport }
    }

    /// Acknowledge receipt of a well-formed command
    pub async fn acknowledge(&self, id: &CommandId) {
        self.notify(rpc::ACKNOWLEDGE, id).await;
    }

    /// Report that the handler started long-running work
    pub async fn mark_executing(&self, id: &CommandId) {
        self.notify(rpc::EXECUTING, id).await;
    }

    /// Report successful completion
    pub async fn mark_complete(&self, id: &CommandId) {
        self.notify(rpc::SUCCESS, id).await;
    }

    /// Report failure
    pub async fn mark_failed(&self, id: &CommandId) {
        self.notify(rpc::FAILED, id).await;
    }

    /// Map a normalized dispatch outcome to exactly one status call
    pub async fn report(&self, id: &CommandId, status: DispatchStatus) {
        match status {
            DispatchStatus::Executing => self.mark_executing(id).await,
            DispatchStatus::Complete => self.mark_complete(id).await,
            DispatchStatus::Failed => self.mark_failed(id).await,
        }
    }

    async fn notify(&self, method: &str, id: &CommandId) {
        if let Err(e) = self.transport.call(method, id).await {
            error!("Error reporting {} for command ID {}: {:#}", method, id, e);
        }
    }
}
