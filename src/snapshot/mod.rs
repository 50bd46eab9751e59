//! On-demand snapshot capture from the motionEye backend
//!
//! ## Key Components
//!
//! - [`SnapshotFetcher`] - trait the gateway calls to capture one image
//! - [`MotionEyeFetcher`] - HTTP implementation writing into the output tree
//! - [`TimeSource`] - clock used to name snapshot files

mod clock;
mod fetcher;
mod http;

pub use clock::{FixedClock, SystemClock, TimeSource};
pub use fetcher::{FetchError, MotionEyeFetcher, SnapshotFetcher, StoredPath, TIMESTAMP_FORMAT};
pub use http::{DownloadError, HttpClient, HttpConfig};
