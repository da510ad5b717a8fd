pub mod ergast;
pub mod lap;
pub mod result;
pub mod row;
pub mod session;
pub mod team;

pub use lap::{format_lap_time, parse_lap_time, LapRecord};
pub use result::{DriverResult, SessionData};
pub use row::DerivedRow;
pub use session::{SessionId, SessionType};
pub use team::{team_color, Outline, Rgba, FALLBACK_COLOR};
