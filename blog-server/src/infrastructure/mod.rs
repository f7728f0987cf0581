pub mod config;
pub mod jwt;
pub mod logging;
pub mod storage;
