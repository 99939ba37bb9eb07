// Adapters layer: concrete implementations for external systems (artifacts, models, http).

pub mod artifacts;
pub mod http;
pub mod linear;
pub mod softmax;
