//! Pure derivations behind the compounding panel: ordering raw trading
//! history and projecting it onto progress toward a capital target.

pub mod history;
pub mod projector;

pub use history::{normalize, sort_key, HistorySeries};
pub use projector::{
    compounding_view, project, CompoundingConfig, ProjectionOverrides,
    DEFAULT_STARTING_CAPITAL_USD, DEFAULT_TARGET_CAPITAL_USD,
};
