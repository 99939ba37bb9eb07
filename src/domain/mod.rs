// Domain layer: request/response data and the ports the core talks through.

pub mod model;
pub mod ports;
