//! Application state for the menu editor and the actions components emit.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use selftape_engine::{EditError, EditOutcome, Identity, NavigationService, NotificationCounter, PublicationService};
use selftape_types::{COURSES_PUBLISHED, FlagChange, Role};
use tracing::{debug, info, warn};

use crate::icons::IconRegistry;
use crate::sidebar::{NavigationContext, build_sidebar};
use crate::ui::components::menu_editor::{MenuEditorState, Notice};
use crate::ui::components::nav_bar::SidebarState;

/// Everything the editor needs from the host process.
pub struct EditorSession {
    pub service: NavigationService,
    pub publication: Arc<PublicationService>,
    pub notifications: Arc<dyn NotificationCounter>,
    pub identity: Identity,
    pub context: NavigationContext,
    /// Role whose menu is opened first.
    pub target: Role,
}

/// Requests emitted by components and executed by [`App::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Reorder { from: usize, to: usize },
    SetVisibility { id: String, visible: bool },
    SetDisabled { id: String, disabled: bool },
    CycleTarget,
    TogglePublished,
    Reset,
    PruneOrphans,
    /// Follow a sidebar link in the preview.
    Navigate(String),
    Quit,
}

pub struct App {
    service: NavigationService,
    publication: Arc<PublicationService>,
    notifications: Arc<dyn NotificationCounter>,
    flag_events: Receiver<FlagChange>,
    pub icons: IconRegistry,
    pub identity: Identity,
    pub context: NavigationContext,
    pub editor: MenuEditorState,
    pub sidebar: SidebarState,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: EditorSession) -> Self {
        let flag_events = session.publication.subscribe();
        let mut app = Self {
            service: session.service,
            publication: session.publication,
            notifications: session.notifications,
            flag_events,
            icons: IconRegistry,
            identity: session.identity,
            context: session.context,
            editor: MenuEditorState::new(session.target),
            sidebar: SidebarState::default(),
            should_quit: false,
        };
        if !app.identity.role.is_admin() {
            app.editor.notice = Some(Notice::error(format!("Signed in as {}; menus are read-only", app.identity.role)));
        }
        app.reload();
        app
    }

    /// Re-reads the target role's list and rebuilds the preview.
    pub fn reload(&mut self) {
        let config = self.service.role_config(self.editor.target);
        let orphans = self.service.orphans(&config);
        self.editor.courses_published = self.publication.flags().get(COURSES_PUBLISHED);
        self.sidebar
            .set_entries(build_sidebar(&config, &self.context, self.notifications.as_ref(), &self.icons));
        self.editor.set_config(config, orphans);
    }

    /// Drains pending publication changes; reconciles again if any arrived.
    pub fn poll_flag_changes(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.flag_events.try_recv() {
                Ok(change) => {
                    debug!(flag = %change.name, value = change.value, "publication change received");
                    changed = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("publication change channel closed");
                    break;
                }
            }
        }
        if changed {
            self.reload();
        }
        changed
    }

    pub fn apply(&mut self, action: Action) {
        let editor = self.identity.role;
        let target = self.editor.target;
        match action {
            Action::Reorder { from, to } => {
                let result = self.service.reorder(editor, target, from, to);
                self.report_edit("Moved item", result);
            }
            Action::SetVisibility { id, visible } => {
                let result = self.service.set_visibility(editor, target, &id, visible);
                let verb = if visible { "Showing" } else { "Hiding" };
                self.report_edit(&format!("{verb} {id}"), result);
            }
            Action::SetDisabled { id, disabled } => {
                let result = self.service.set_disabled(editor, target, &id, disabled);
                let verb = if disabled { "Disabled" } else { "Enabled" };
                self.report_edit(&format!("{verb} {id}"), result);
            }
            Action::PruneOrphans => {
                let result = self.service.prune_orphans(editor, target);
                self.report_edit("Pruned orphaned items", result);
            }
            Action::Reset => match self.service.reset(editor, target) {
                Ok(config) => self.editor.notice = Some(Notice::info(format!("Reset {target} menu ({} items)", config.len()))),
                Err(error) => self.reject(error),
            },
            Action::CycleTarget => {
                let next = self.editor.next_target();
                self.editor.retarget(next);
                self.editor.notice = next.is_admin().then(|| Notice::info("The admin menu is read-only"));
            }
            Action::TogglePublished => self.toggle_published(),
            Action::Navigate(href) => {
                debug!(href = %href, "preview navigation");
                self.context.current_path = href;
            }
            Action::Quit => {
                self.should_quit = true;
                return;
            }
        }
        self.reload();
    }

    fn toggle_published(&mut self) {
        if !self.identity.role.is_admin() {
            self.editor.notice = Some(Notice::error("Only administrators can change publication flags"));
            return;
        }
        let value = !self.publication.flags().get(COURSES_PUBLISHED);
        match self.publication.set_flag(COURSES_PUBLISHED, value) {
            Ok(_) => {
                info!(flag = COURSES_PUBLISHED, value, "publication flag toggled from editor");
                self.editor.notice = Some(Notice::info(format!("{COURSES_PUBLISHED} = {value}")));
            }
            Err(error) => {
                warn!(error = %error, "Failed to save publication flag");
                self.editor.notice = Some(Notice::error(format!("Could not save {COURSES_PUBLISHED}: {error}")));
            }
        }
    }

    fn report_edit(&mut self, label: &str, result: Result<EditOutcome, EditError>) {
        match result {
            Ok(outcome) if outcome.is_updated() => self.editor.notice = Some(Notice::info(label)),
            Ok(_) => self.editor.notice = Some(Notice::info("No change")),
            Err(error) => self.reject(error),
        }
    }

    fn reject(&mut self, error: EditError) {
        debug!(error = %error, "edit rejected");
        self.editor.notice = Some(Notice::error(error.to_string()));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use selftape_engine::{IdentityProvider, NoNotifications, StaticIdentity};
    use selftape_registry::TemplateRegistry;
    use selftape_util::{InMemoryStore, KeyValueStore};

    pub(crate) fn app_for(role: Role, target: Role) -> App {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let publication = Arc::new(PublicationService::new(store.clone()));
        let service = NavigationService::new(Arc::new(TemplateRegistry::embedded().unwrap()), store, publication.clone());
        let identity = StaticIdentity::new("u-1", role).current().unwrap();
        App::new(EditorSession {
            service,
            publication,
            notifications: Arc::new(NoNotifications),
            identity,
            context: NavigationContext::new("u-1", "/sessions"),
            target,
        })
    }

    #[test]
    fn hiding_an_item_updates_editor_and_preview() {
        let mut app = app_for(Role::Admin, Role::Actor);
        assert!(app.sidebar.entries.iter().any(|entry| entry.id == "/sessions"));

        app.apply(Action::SetVisibility {
            id: "/sessions".into(),
            visible: false,
        });
        assert!(!app.editor.config.item("/sessions").unwrap().is_visible);
        assert!(app.sidebar.entries.iter().all(|entry| entry.id != "/sessions"));
        assert_eq!(app.editor.notice, Some(Notice::info("Hiding /sessions")));
    }

    #[test]
    fn publication_toggle_reconciles_through_the_change_channel() {
        let mut app = app_for(Role::Admin, Role::Tutor);
        assert!(!app.editor.config.item("/courses").unwrap().is_visible);

        app.apply(Action::TogglePublished);
        assert!(app.poll_flag_changes());
        assert!(app.editor.courses_published);
        assert!(app.editor.config.item("/courses").unwrap().is_visible);
        assert!(!app.editor.config.item("/courses/coming-soon").unwrap().is_visible);
        assert!(!app.poll_flag_changes());
    }

    #[test]
    fn admin_target_reports_locked_menu() {
        let mut app = app_for(Role::Admin, Role::Admin);
        let before = app.editor.config.clone();
        app.apply(Action::Reorder { from: 0, to: 2 });
        assert_eq!(app.editor.config, before);
        assert!(app.editor.notice.as_ref().is_some_and(|notice| notice.is_error));
    }

    #[test]
    fn non_admins_cannot_edit_or_publish() {
        let mut app = app_for(Role::Tutor, Role::Actor);
        app.apply(Action::TogglePublished);
        assert!(app.editor.notice.as_ref().is_some_and(|notice| notice.is_error));
        assert!(!app.poll_flag_changes());

        app.apply(Action::SetDisabled {
            id: "/sessions".into(),
            disabled: true,
        });
        assert!(!app.editor.config.item("/sessions").unwrap().is_disabled);
    }

    #[test]
    fn navigate_moves_the_active_entry() {
        let mut app = app_for(Role::Admin, Role::Actor);
        app.apply(Action::Navigate("/messages".into()));
        let active: Vec<_> = app.sidebar.entries.iter().filter(|entry| entry.active).map(|entry| entry.id.as_str()).collect();
        assert_eq!(active, vec!["/messages"]);
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = app_for(Role::Admin, Role::Actor);
        app.apply(Action::Quit);
        assert!(app.should_quit);
    }
}
