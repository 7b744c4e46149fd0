//! Process wiring: HTTP surface and the engine runtime.

pub mod http;
pub mod runtime;

pub use http::AppState;
pub use runtime::EngineRuntime;
