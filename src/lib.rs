pub mod archive;
pub mod config;
pub mod error;
pub mod game;
pub mod http_client;
pub mod logging;
pub mod quality;
pub mod render;
pub mod season;
pub mod site;
pub mod standings;
pub mod week_fetch;
