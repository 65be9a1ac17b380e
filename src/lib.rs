pub mod app;
pub mod audio;
pub mod chat;
pub mod config;
pub mod device;
pub mod event;
pub mod input;
pub mod model;
pub mod notify;
pub mod prefs;
pub mod stream;
pub mod util;
