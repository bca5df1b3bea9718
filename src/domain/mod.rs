// Domain layer: address shapes, race outcome and the ports the coordinator talks to.

pub mod model;
pub mod ports;
