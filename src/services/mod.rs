pub mod ladder;
pub mod server;
