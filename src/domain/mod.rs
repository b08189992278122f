// Domain layer: card model and storage port. Knows nothing about concrete backends.

pub mod model;
pub mod ports;
