//! EasyStory CLI Library Crate
//!
//! Environment configuration and command implementations for the `easystory`
//! binary, which is a thin wrapper around this library.

pub mod commands;
pub mod config;
