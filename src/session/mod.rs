// src/session/mod.rs

pub mod state;
pub mod store;

pub use state::{transition, Action, Event, Session, Transition, XLSX_MIME_TYPE};
pub use store::SessionStore;
