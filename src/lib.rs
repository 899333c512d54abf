//! MoodFE — a native moodboard toy.
//!
//! Drag artwork between numbered wells, name each piece the first time it
//! lands, tape and frame the board, tint wells with the paint bucket,
//! doodle, and save the result as a PNG. The library half exists so the
//! board core and the export compositor can be driven headless from the
//! integration tests.

pub mod app;
pub mod assets;
pub mod board;
pub mod canvas;
pub mod components;
pub mod export;
pub mod logger;
pub mod theme;
