//! Data models for WebOS

mod icon;
mod pending;
mod scope;
mod settings;
mod tenant;

pub use icon::{
    CategoryId, FileData, FolderData, FolderRef, Icon, IconData, IconId, IconKind, LinkData,
    MediaKind, OpenMode,
};
pub use pending::{IconUpdate, PendingEdit, PendingKind};
pub use scope::{Scope, DEFAULT_SCOPE_PART};
pub use settings::{ConflictStrategy, SyncSettings};
pub use tenant::{Membership, Tenant};
