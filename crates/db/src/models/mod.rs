pub mod case;
pub mod status_history;
