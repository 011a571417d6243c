//! Live merge view: one ordered, deduplicated list combining the remote
//! authoritative stream with locally-pending reports.

mod merge;
mod stream;
mod view;

pub use merge::merge_reports;
pub use stream::{RemoteRecord, StreamConfig, StreamMessage, StreamMessageKind};
pub use view::{ConnectionState, LiveView, LiveViewTask};
