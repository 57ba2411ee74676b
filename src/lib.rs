//! HandPuppet Library
//!
//! Gesture and voice driven avatar animation: landmark classification,
//! hold debouncing, motion targets, smoothing and the animation controller.

pub mod animation;
pub mod assets;
pub mod commands;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod gesture;
pub mod ipc;
pub mod landmarks;
pub mod motion;
pub mod shared;
pub mod skeleton;
pub mod smoothing;
pub mod utils;
