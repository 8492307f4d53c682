pub mod deploy;
pub mod info;
pub mod init;
pub mod models;
pub mod package;
pub mod profile;
pub mod quota;
pub mod region;
