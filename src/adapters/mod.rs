//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter      | Implements          | Connects to                   |
//! |--------------|---------------------|-------------------------------|
//! | `fifo`       | CommandSource       | named pipe on the filesystem  |
//! | `gpio_chip`  | PinPort             | Linux GPIO character device   |
//! | `hardware`   | PinPort, RandomPort | bundle of pins + rng + sleep  |
//! |              | Sleeper             |                               |
//! | `log_sink`   | EventSink           | `log` facade                  |
//! | `sim_pins`   | PinPort             | in-memory pin bank            |
//! | `time`       | Sleeper             | `std::thread::sleep`          |
//! | `urandom`    | RandomPort          | `/dev/urandom`                |

pub mod fifo;
#[cfg(feature = "gpiocdev")]
pub mod gpio_chip;
pub mod hardware;
pub mod log_sink;
pub mod sim_pins;
pub mod time;
pub mod urandom;
