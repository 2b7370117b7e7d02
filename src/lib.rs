#![allow(unexpected_cfgs)] // Silence cfg warnings from objc macros

//! Reference-counted interface substrate and native menu bridge.
//!
//! The pure core (everything but `platform`) has no FFI so it can be tested
//! against the headless toolkit:
//!
//! - [`com`]: interface ids, handles, capability queries, boundary status codes
//! - [`callback`]: action, predicate and event-sink proxies
//! - [`menu`]: the menu tree mirrored onto a [`Toolkit`]
//! - [`export`]: reconciles a declarative [`NativeMenu`] into that tree
//! - [`input`]: key gestures
//! - [`events`]: menu lifecycle notifications
//!
//! ```
//! use menubridge::{HeadlessToolkit, NativeFactory};
//!
//! let factory = NativeFactory::new(HeadlessToolkit::new());
//! let menu = factory.create_menu();
//! let open = factory.create_menu_item();
//! open.set_title("Open").unwrap();
//! menu.insert_item(0, &open).unwrap();
//! assert_eq!(menu.len(), 1);
//! ```

pub mod callback;
pub mod com;
pub mod config;
pub mod events;
pub mod export;
pub mod input;
pub mod logging;
pub mod menu;
pub mod platform;
pub mod toolkit;

pub use callback::{ActionProxy, CallbackError, CallbackResult, EventSinkProxy, PredicateProxy};
pub use com::{ComError, ComPtr, ComResult, ComWeak, HResult, Iid, Interface, InterfaceRegistry, ObjectId, Unknown};
pub use config::{BridgeConfig, ConfigError};
pub use events::{EventBus, EventPublisher, MenuEvent};
pub use export::{ExportMode, MenuExporter, NativeMenu, NativeMenuEntry, NativeMenuItem};
pub use input::{GestureParseError, Key, KeyGesture, KeyModifiers};
pub use logging::init_logging;
pub use menu::{Menu, MenuItem, MenuItemKind, NativeFactory};
pub use toolkit::{HeadlessToolkit, Toolkit};
