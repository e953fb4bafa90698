// Domain layer: MARC selectors, the field lookup table and the ports the
// adapters implement. No HTTP or filesystem code lives here.

pub mod lookup;
pub mod model;
pub mod ports;
