pub mod config;
pub mod error;
pub mod geometry;
pub mod membership;
pub mod presenter;
pub mod publisher;
pub mod registry;
pub mod sensor;
pub mod store;
pub mod surface;
pub mod system;

// Re-exports
pub use error::{WinlinkError, WinlinkResult};
pub use geometry::{Marker, Point, Rect};
pub use registry::{MemberId, SharedRegistry};
pub use system::{MemberState, WindowSystem};
