//! Session fault taxonomy
//!
//! None of these faults escape the session: activation and poll faults
//! degrade the turn to `EmptyTurn`, cleanup faults are logged and
//! swallowed. A stuck subscription self-heals on the next activation's
//! pause/vocabulary/unpause sequence.

use naotalk_asr::AsrError;
use thiserror::Error;

/// Faults raised while driving the recognizer through one session
#[derive(Debug, Error)]
pub enum SessionFault {
    /// The pause/vocabulary/subscribe sequence failed
    #[error("Recognizer activation failed: {0}")]
    Activation(AsrError),

    /// Reading the latest event failed mid-turn
    #[error("Recognizer poll failed: {0}")]
    Poll(AsrError),

    /// Unsubscribing at session end failed
    #[error("Recognizer cleanup failed: {0}")]
    Cleanup(AsrError),
}
