pub mod cases;
pub mod history;
