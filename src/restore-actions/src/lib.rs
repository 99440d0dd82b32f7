pub mod model;
pub mod resources_logic;

pub use resources_logic::*;

#[cfg(test)]
pub mod fixtures;
