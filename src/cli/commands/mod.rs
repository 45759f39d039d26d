pub mod auth;
pub mod explore;
pub mod init;
pub mod render;
pub mod synth;
