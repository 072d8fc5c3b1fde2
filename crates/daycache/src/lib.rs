//! # daycache
//!
//! Process-local memoization that is valid until midnight.
//!
//! ## Architecture
//! - **Key**: identity + date-stamp (`report:2025-08-21`), optionally the
//!   argument signature
//! - **Store**: AHash map behind one mutex, owned by a [`DayCache`]
//! - **Sweep**: every miss removes all entries not from today
//!
//! ```
//! use daycache::{Args, DayCache};
//!
//! let cache: DayCache<u64> = DayCache::new();
//! let total = cache
//!     .get_or_compute("total", &Args::new(), || Ok::<_, std::io::Error>(42))
//!     .unwrap();
//! assert_eq!(total, 42);
//! ```

#![warn(missing_docs)]

mod cache;
mod clock;
mod config;
mod error;
mod key;
mod memo;
mod stats;

pub use cache::DayCache;
pub use clock::{
    date_stamp, parse_date_stamp, Clock, LocalClock, ManualClock, UtcClock, DATE_STAMP_FORMAT,
};
pub use config::{CacheConfig, TimeZone, ENV_DEDUPE_MISSES, ENV_KEY_POLICY, ENV_TIME_ZONE};
pub use error::{Error, Result};
pub use key::{Args, CacheKey, KeyPolicy};
pub use memo::Memoized;
pub use stats::CacheStats;
