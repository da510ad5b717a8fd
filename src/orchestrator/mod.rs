//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 串起一次分析的全部步骤，本身不做具体业务判断。
//!
//! ```text
//! session_runner (App: 加载 → 分析 → 输出)
//!     ↓
//! services (能力层：session_loader / fastest_lap / dnf / delta)
//!     ↓
//! clients (基础设施：ErgastClient + ResponseCache)
//!     ↓
//! render (展示：HtmlChart / TextTable)
//! ```

pub mod session_runner;

pub use session_runner::{analyze, Analysis, App};
