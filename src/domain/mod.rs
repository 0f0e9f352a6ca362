// Domain layer: records, run status and the ports the pipeline depends on.

pub mod model;
pub mod ports;
