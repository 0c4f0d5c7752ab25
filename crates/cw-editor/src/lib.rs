pub mod commands;
pub mod coordinator;
pub mod drag;
pub mod selection;

pub use commands::{CommandHistory, EditOp, UndoEntry};
pub use coordinator::{EditingCoordinator, FailureSink};
pub use drag::{DragReorderEngine, DragState, MoveIntent};
pub use selection::{SelectionModel, SelectionState};
