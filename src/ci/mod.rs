pub mod event;
pub mod output;
