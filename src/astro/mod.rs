//! Astronomical calculations behind the bot's replies.
//!
//! Two independent, stateless calculators, each a pure function of a
//! [`GeoPosition`] and a UTC instant:
//!
//! - [`moon`]: fraction of the current lunation and its named phase
//! - [`sun`]: next sunrise and sunset, or the circumpolar condition
//!
//! Neither holds state or performs I/O, so both can be called concurrently
//! from any number of threads. Local-time presentation of the returned UTC
//! instants is left to the caller, which knows the relevant time zone.

pub mod error;
pub mod julian;
pub mod moon;
pub mod position;
pub mod sun;
pub mod timezone;

pub use error::{PhaseComputationError, PositionError, SunEventError};
pub use moon::{MoonPhase, MoonPhaseLabel, phase};
pub use position::GeoPosition;
pub use sun::{CircumpolarKind, SunEventResult, sun_events, sun_events_on};
pub use timezone::determine_timezone_from_coordinates;
