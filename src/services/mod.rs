pub mod delta;
pub mod dnf;
pub mod fastest_lap;
pub mod session_loader;

pub use delta::{build_rows, sort_by_delta_desc, DNF_OPACITY};
pub use dnf::DnfClassifier;
pub use fastest_lap::{fastest_per_driver, FastestLap, QuickLapFilter};
pub use session_loader::SessionLoader;
