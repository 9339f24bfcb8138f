//! Time sources and frame pacing.
//!
//! Intended usage:
//! - one `FrameLimiter` per loop, backed by a shared `Clock`
//! - call `start_frame()` once at the top of every iteration and
//!   `wait_for_next_frame()` once at the bottom
//! - swap `SystemClock` for `FakeClock` to make the loop deterministic in tests

mod clock;
mod frame_limiter;

pub use clock::{Clock, FakeClock, SystemClock, Timestamp};
pub use frame_limiter::{FrameLimiter, DEFAULT_MAX_FPS, MAX_REPORTED_FPS};
