//! Time sources.
//!
//! Stage debounce, cue hysteresis and the completion fades all read time
//! through [`Clock`], so tests can step time by hand instead of sleeping.

use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;

/// Milliseconds since an arbitrary, fixed origin.
pub type Millis = f64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Wall clock. Uses `instant` so the same code runs under wasm.
#[derive(Clone, Debug)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same time cell.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new(start_ms: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}
