pub mod commands;
pub mod controller;
pub mod error;
pub mod playlist;
pub mod queue;
pub mod state;
pub mod sync;
pub mod traits;
