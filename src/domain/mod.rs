// Domain layer: models and ports. The core only depends on this module.

pub mod model;
pub mod ports;
