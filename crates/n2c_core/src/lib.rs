//! notion2content core: the content record and hypertext tree data model.
mod node;
mod record;

pub use node::{Node, Properties, PropertyValue};
pub use record::{ContentRecord, Props};
