pub mod automation;
#[cfg(feature = "chromium")]
pub mod chromium;
pub mod dates;
pub mod error;
pub mod pacing;
pub mod selectors;
pub mod session;
pub mod wait;

pub use automation::{Automation, ContextId};
#[cfg(feature = "chromium")]
pub use chromium::{ChromiumDriver, LaunchOptions};
pub use dates::normalize_expiration;
pub use error::{DriverError, ScraperError};
pub use pacing::Pacing;
pub use selectors::PageProfile;
pub use session::{Extraction, ExtractionSession};
pub use wait::Waiter;
