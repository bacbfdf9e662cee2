mod keyboard;
mod orientation;
mod pointer;

pub use keyboard::wire_keyboard;
pub use orientation::{wire_device_orientation, wire_enable_motion};
pub use pointer::wire_tap;
