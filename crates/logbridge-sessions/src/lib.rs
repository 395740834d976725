//! Session correlation between browser agent session ids and host session ids

mod correlator;

pub use correlator::{SessionCorrelator, DEFAULT_IDLE_TTL};
