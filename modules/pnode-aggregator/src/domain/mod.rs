pub mod address;
pub mod cache;
pub mod error;
pub mod merge;
pub mod pacing;
pub mod ports;
pub mod service;
