pub mod config;
pub mod deploy;
pub mod logging;
pub mod models;
pub mod package;
pub mod quota;
pub mod region;
