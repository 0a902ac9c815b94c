//! Services
//!
//! Transition detection, notification delivery and the poll loop that ties
//! them together.

pub mod detector;
pub mod notify;
pub mod poller;

pub use detector::{ScanReport, TransitionDetector};
pub use notify::NotifyService;
pub use poller::{PollLoop, PollSummary};
