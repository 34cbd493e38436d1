// ChatKing state managers
// Managers handle stateful browse operations: tabs and per-tab navigation history.

pub mod history_manager;
pub mod tab_manager;
