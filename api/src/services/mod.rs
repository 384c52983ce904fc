pub mod telemetry;

pub use telemetry::{
    compounding_view_for, load_compounding, load_dashboard, proxy_get, proxy_post,
    snapshot_with_history, RECENT_PNL_ENTRIES,
};
