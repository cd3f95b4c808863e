//! Drivers wrapping concrete parsers.

use std::sync::Arc;

use resources::ResourceLoader;
use selection::Driver;

mod perfect;
mod sax;
mod xmllint;

pub use perfect::PerfectDriver;
pub use sax::{QuickXmlDriver, ScanError, scan};
pub use xmllint::XmllintDriver;

pub const DRIVER_NAMES: [&str; 3] = [PerfectDriver::NAME, XmllintDriver::NAME, QuickXmlDriver::NAME];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown driver: {0}")]
pub struct UnknownDriver(pub String);

/// Build a driver by name. Drivers that read fixtures themselves use
/// `loader`.
pub fn driver_by_name(
    name: &str,
    loader: Arc<dyn ResourceLoader>,
) -> Result<Arc<dyn Driver>, UnknownDriver> {
    match name {
        PerfectDriver::NAME => Ok(Arc::new(PerfectDriver::new())),
        XmllintDriver::NAME => Ok(Arc::new(XmllintDriver::new())),
        QuickXmlDriver::NAME => Ok(Arc::new(QuickXmlDriver::new(loader))),
        other => Err(UnknownDriver(other.to_string())),
    }
}
