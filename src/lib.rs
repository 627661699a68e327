pub mod bot;
pub mod config;
pub mod dataset;
pub mod error;
pub mod lookup;
pub mod session;
pub mod telegram;
pub mod upload;

pub use config::Config;
pub use dataset::{AddressRecord, AddressTable, SchemaVariant};
pub use error::{LookupError, Result};
pub use lookup::{answer_query, format_record, matches};
pub use session::{Action, Event, Session, SessionStore};
