// Domain layer: portal model types and the ports the engine talks through.

pub mod model;
pub mod ports;
