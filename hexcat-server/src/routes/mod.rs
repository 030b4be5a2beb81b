//! HTTP route handlers

pub mod board;
pub mod error;
pub mod game;
pub mod scores;
pub mod status;
