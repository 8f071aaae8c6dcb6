//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext};
use crate::controller::reducer::ViewController;

/// Queues `cmd` for the backend worker. Returns whether it was queued; on
/// failure the reason lands in the controller's error slot.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    controller: &mut ViewController,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            controller.report_error(UiError::new(
                UiErrorContext::CommandQueue,
                UiErrorCategory::Internal,
                "UI command queue is full; please retry",
            ));
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            controller.report_error(UiError::new(
                UiErrorContext::CommandQueue,
                UiErrorCategory::Internal,
                "Backend worker stopped (possible startup/runtime failure); restart the planner",
            ));
            false
        }
    }
}
