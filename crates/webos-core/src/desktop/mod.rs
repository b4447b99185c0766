//! Desktop view state with optimistic updates.
//!
//! The controller is bound to one scope and publishes what is on screen
//! through a [`watch`] channel, so a front end sees the cached paint, the
//! loading flag and optimistic removals while requests are still in
//! flight. Moves are applied locally before the server confirms them and
//! restored from a snapshot when it refuses.

use tokio::sync::watch;

use crate::api::{DesktopApi, NewFolder, NewLink};
use crate::clock::{Clock, SystemClock};
use crate::models::{FolderRef, Icon, IconId, IconUpdate, Scope};
use crate::services::LocalStore;
use crate::Result;

/// What happened to a drag-and-drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped onto itself or onto a smart folder; nothing was sent
    Ignored,
    /// The server accepted the move
    Moved,
    /// The server refused; the icon list was restored. Carries a user-facing message.
    RolledBack(String),
}

/// Everything a desktop front end renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesktopView {
    pub icons: Vec<Icon>,
    pub loading: bool,
    pub current_folder: FolderRef,
    pub edit_mode: bool,
}

pub struct DesktopController<A, C = SystemClock> {
    scope: Scope,
    store: LocalStore,
    api: A,
    clock: C,
    view: watch::Sender<DesktopView>,
}

impl<A: DesktopApi> DesktopController<A> {
    pub fn new(scope: Scope, store: LocalStore, api: A) -> Self {
        Self::with_clock(scope, store, api, SystemClock)
    }
}

impl<A: DesktopApi, C: Clock> DesktopController<A, C> {
    pub fn with_clock(scope: Scope, store: LocalStore, api: A, clock: C) -> Self {
        let (view, _) = watch::channel(DesktopView::default());
        Self {
            scope,
            store,
            api,
            clock,
            view,
        }
    }

    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Follow view changes as they happen
    pub fn subscribe(&self) -> watch::Receiver<DesktopView> {
        self.view.subscribe()
    }

    /// Snapshot of the current view
    pub fn view(&self) -> DesktopView {
        self.view.borrow().clone()
    }

    pub fn icons(&self) -> Vec<Icon> {
        self.view.borrow().icons.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.view.borrow().loading
    }

    pub fn current_folder(&self) -> FolderRef {
        self.view.borrow().current_folder
    }

    pub fn edit_mode(&self) -> bool {
        self.view.borrow().edit_mode
    }

    /// Show the cached icons, if any. Returns whether anything was painted.
    pub async fn paint_cached(&self) -> Result<bool> {
        let cached = self.store.get_icons(&self.scope).await?;
        if cached.is_empty() {
            return Ok(false);
        }
        self.view.send_modify(|view| view.icons = cached);
        Ok(true)
    }

    /// Show the icons of `parent`.
    ///
    /// A non-empty cache is painted first; the server listing then replaces
    /// both the view and the cache. Failures are logged and leave whatever
    /// was painted.
    pub async fn fetch_icons(&self, parent: FolderRef) {
        self.view.send_modify(|view| {
            view.loading = true;
            view.current_folder = parent;
        });

        if let Err(error) = self.paint_cached().await {
            tracing::warn!("Cached icons for scope {} unreadable: {}", self.scope, error);
        }

        match self.api.list_icons(&self.scope, parent).await {
            Ok(icons) => {
                // The cache holds one icon set per scope, whichever folder was listed last
                if let Err(error) = self.store.save_icons(&self.scope, &icons).await {
                    tracing::error!("Failed to cache icons for scope {}: {}", self.scope, error);
                }
                self.view.send_modify(|view| view.icons = icons);
            }
            Err(error) => tracing::error!("Failed to fetch icons for {}: {}", parent, error),
        }

        self.view.send_modify(|view| view.loading = false);
    }

    /// Move `dragged` into the folder `target`, optimistically.
    pub async fn handle_drop(&self, dragged: IconId, target: FolderRef) -> DropOutcome {
        if !target.accepts_icons() {
            tracing::debug!("Ignoring drop of icon {} onto smart folder {}", dragged, target);
            return DropOutcome::Ignored;
        }
        if self.opens_folder(dragged, target) {
            return DropOutcome::Ignored;
        }

        tracing::debug!("Moving icon {} into folder {}", dragged, target);
        let snapshot = self.icons();
        self.view
            .send_modify(|view| view.icons.retain(|icon| icon.id != dragged));

        match self.api.move_icon(&self.scope, dragged, target).await {
            Ok(()) => DropOutcome::Moved,
            Err(error) => {
                tracing::warn!("Move of icon {} failed, restoring: {}", dragged, error);
                self.view.send_modify(|view| view.icons = snapshot);
                DropOutcome::RolledBack(error.user_message())
            }
        }
    }

    /// Whether `icon` is the folder icon of `folder` itself
    fn opens_folder(&self, icon: IconId, folder: FolderRef) -> bool {
        let FolderRef::Category(category) = folder else {
            return false;
        };
        self.view
            .borrow()
            .icons
            .iter()
            .find(|candidate| candidate.id == icon)
            .and_then(Icon::folder_id)
            == Some(category)
    }

    /// Move an icon on the desktop and queue the change for sync.
    ///
    /// A failure to queue is returned. A failed server update is only
    /// logged; the queued edit goes out with the next push.
    pub async fn update_position(&self, id: IconId, x: i64, y: i64) -> Result<()> {
        self.view.send_modify(|view| {
            if let Some(icon) = view.icons.iter_mut().find(|icon| icon.id == id) {
                icon.x = x;
                icon.y = y;
            }
        });

        let update = IconUpdate {
            id,
            x,
            y,
            updated_at: self.clock.now(),
        };
        self.store.queue_icon_update(&self.scope, &update).await?;

        if let Err(error) = self.api.update_position(&self.scope, id, x, y).await {
            tracing::warn!("Failed to save position of icon {}: {}", id, error);
        }
        Ok(())
    }

    /// Rename an icon once the server accepts the new title.
    pub async fn rename_icon(&self, id: IconId, name: &str) -> Result<()> {
        self.api.rename_icon(&self.scope, id, name).await?;
        self.view.send_modify(|view| {
            if let Some(icon) = view.icons.iter_mut().find(|icon| icon.id == id) {
                icon.title = name.to_string();
            }
        });
        Ok(())
    }

    /// Uninstall an icon (and what it points at) on the server, then drop it
    /// from the view.
    pub async fn remove_icon(&self, id: IconId) -> Result<()> {
        self.api.uninstall_icon(&self.scope, id).await?;
        self.view
            .send_modify(|view| view.icons.retain(|icon| icon.id != id));
        Ok(())
    }

    /// Create a folder; it joins the view when created in the open folder.
    pub async fn create_folder(&self, folder: &NewFolder) -> Result<Icon> {
        let icon = self.api.create_folder(&self.scope, folder).await?;
        self.show_created(&icon, folder.parent_id);
        Ok(icon)
    }

    /// Create a link icon; it joins the view when created in the open folder.
    pub async fn create_link(&self, link: &NewLink) -> Result<Icon> {
        let icon = self.api.create_link(&self.scope, link).await?;
        self.show_created(&icon, link.parent_id);
        Ok(icon)
    }

    fn show_created(&self, icon: &Icon, parent: FolderRef) {
        self.view.send_if_modified(|view| {
            if view.current_folder != parent {
                return false;
            }
            view.icons.push(icon.clone());
            true
        });
    }

    pub fn set_edit_mode(&self, value: bool) {
        self.view.send_modify(|view| view.edit_mode = value);
    }

    pub fn toggle_edit_mode(&self) {
        self.view.send_modify(|view| view.edit_mode = !view.edit_mode);
    }
}
