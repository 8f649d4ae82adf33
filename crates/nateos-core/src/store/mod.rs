// ── Domain view storage ──

mod view;

pub use view::{DomainView, LoadTicket, ViewStore};
