/// Sign-in and session payloads.
pub mod auth;
/// Game creation, listing and control payloads.
pub mod games;
/// Health check payload.
pub mod health;
/// Player payloads.
pub mod players;
/// Sport rule payloads.
pub mod sports;
/// Server-sent event payloads.
pub mod sse;
/// Player stat and overview payloads.
pub mod stats;
/// Team payloads.
pub mod teams;
pub mod validation;
