pub mod keypad;
pub mod menu;

pub use keypad::{FunctionKey, Key, Keypad, PendingOp, UnknownKey, parse_keys};
pub use menu::Menu;
