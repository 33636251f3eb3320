// Game engine: colors, state machine, round pacing
pub mod game;

// Presentation boundary and its adapters
pub mod presentation;

// Per-connection game sessions
pub mod session;

// HTTP and WebSocket APIs
pub mod api;

// Configuration loading
pub mod config;
