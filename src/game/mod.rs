//! Game module - turn engine, actions, and the running session

pub mod actions;
pub mod engine;
pub mod error;
pub mod message_log;
pub mod session;
pub mod turn;

pub use actions::{Action, ActionKind, ActionOutcome};
pub use engine::Engine;
pub use error::{ActionError, EngineFault};
pub use message_log::{Message, MessageLog};
pub use session::{LoopControl, Session};
pub use turn::{TurnPhase, TurnResult};
