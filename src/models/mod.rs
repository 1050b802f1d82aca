pub mod account;
pub mod content;
pub mod preferences;

pub use account::{Account, Bookmark, GenreScore, IdentityToken};
pub use content::{ApprovalStatus, ContentItem, ContentKind, Genre};
pub use preferences::PreferenceSet;
