//! Feature Encoding Module
//!
//! Layout (versioned schema), FeatureVector và encoder SensorReading → vector.

pub mod layout;
pub mod vector;
pub mod encoder;

#[cfg(test)]
mod tests;

pub use layout::{
    FEATURE_CARDINALITY, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LABEL_COLUMN,
    LayoutInfo, grid_size, is_layout_compatible, layout_hash,
    validate_header, validate_layout,
};
pub use vector::FeatureVector;
pub use encoder::{encode, grid, SignalBand};
