//! Realtime client adapters.
//!
//! - [`LoopbackClient`]: in-process simulation for offline use
//! - [`RtviHttpClient`]: RTVI start handshake over HTTP (feature `rtvi-http`)

mod loopback;
#[cfg(feature = "rtvi-http")]
mod rtvi_http;

pub use loopback::LoopbackClient;
#[cfg(feature = "rtvi-http")]
pub use rtvi_http::RtviHttpClient;
