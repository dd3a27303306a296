pub mod distance_feather_strategy;
pub mod flat_feather_strategy;
mod gaussian;
pub mod matte_factory;
pub mod morphology;
