//! Menu notifications.
//!
//! The native side reports toolkit lifecycle events (a menu opening, an item
//! being validated or selected, a callback failing) to an event-sink proxy.
//! The sink is invoked synchronously; [`EventBus`] provides a sink that
//! queues events so the managed side can handle them on its own schedule.
//!
//! ```text
//! ┌─────────────┐   notify()   ┌───────────────┐  publish()  ┌──────────┐
//! │ MenuDelegate│ ───────────▶ │ EventSinkProxy│ ──────────▶ │ EventBus │
//! │  MenuItem   │              └───────────────┘             └────┬─────┘
//! └─────────────┘                                                 │ drain()
//!                                                                 ▼
//!                                                          managed handler
//! ```
//!
//! # Module Structure
//!
//! - [`types`]: Event definitions (`MenuEvent` enum)
//! - [`bus`]: `EventBus` and `EventPublisher` types

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventPublisher};
pub use types::MenuEvent;
