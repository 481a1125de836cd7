// Domain layer: core models, ports and pure services. No I/O here.

pub mod model;
pub mod ports;

pub mod services;
