#[doc(inline)]
pub use rescreen_core as core;

#[cfg(feature = "bootstrap")]
#[doc(inline)]
pub use rescreen_bootstrap as bootstrap;

#[cfg(feature = "analysis")]
#[doc(inline)]
pub use rescreen_analysis as analysis;

pub use rescreen_core::{RescreenError, Result};
