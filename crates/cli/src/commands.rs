use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use selftape_engine::{
    EditOutcome, Identity, IdentityProvider, NavigationService, PublicationService, StaticIdentity, StoredNotificationCounter,
};
use selftape_registry::TemplateRegistry;
use selftape_tui::{EditorSession, IconRegistry, NavigationContext, SidebarEntry, build_sidebar};
use selftape_types::{Role, RoleNavConfig};
use selftape_util::{AppSettings, JsonFileStore, KeyValueStore};
use tracing::debug;

use crate::cli::{Cli, Command, FlagsCommand, ShowArgs, UnreadCommand};
use crate::{resolve_identity, resolve_store_path};

/// Shared handles for one invocation.
pub struct Session {
    registry: Arc<TemplateRegistry>,
    store: Arc<dyn KeyValueStore>,
    publication: Arc<PublicationService>,
    identity: Identity,
}

impl Session {
    pub fn open(cli: &Cli, settings: &AppSettings) -> Result<Self> {
        let registry = TemplateRegistry::embedded().context("embedded navigation catalog is invalid")?;
        let store_path = resolve_store_path(cli, settings);
        debug!(path = %store_path.display(), "opening store");
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(store_path));
        let (user_id, role) = resolve_identity(cli, settings);
        let identity = StaticIdentity::new(user_id, role).current().context("no signed-in user")?;
        Ok(Self::new(Arc::new(registry), store, identity))
    }

    pub fn new(registry: Arc<TemplateRegistry>, store: Arc<dyn KeyValueStore>, identity: Identity) -> Self {
        let publication = Arc::new(PublicationService::new(store.clone()));
        Self {
            registry,
            store,
            publication,
            identity,
        }
    }

    fn service(&self) -> NavigationService {
        NavigationService::new(self.registry.clone(), self.store.clone(), self.publication.clone())
    }

    fn counter(&self) -> StoredNotificationCounter {
        StoredNotificationCounter::new(self.store.clone())
    }

    pub fn edit(self, target: Option<Role>) -> Result<()> {
        let target = target.unwrap_or(if self.identity.role.has_navigation() && !self.identity.role.is_admin() {
            self.identity.role
        } else {
            Role::Actor
        });
        let service = self.service();
        let context = NavigationContext::new(self.identity.user_id.clone(), "/");
        selftape_tui::run(EditorSession {
            service,
            notifications: Arc::new(self.counter()),
            publication: self.publication,
            identity: self.identity,
            context,
            target,
        })
    }
}

pub fn execute(session: &Session, command: Command, out: &mut dyn Write) -> Result<()> {
    let editor = session.identity.role;
    let service = session.service();
    match command {
        Command::Show(args) => show(session, &service, args, out),
        Command::Dump { target } => {
            let config = service.role_config(target.unwrap_or(editor));
            writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
            Ok(())
        }
        Command::Templates { target } => templates(session, target, out),
        Command::Reorder { target, from, to } => report(out, service.reorder(editor, target, from, to)?),
        Command::Visibility { target, id, visible } => report(out, service.set_visibility(editor, target, &id, visible)?),
        Command::Disabled { target, id, disabled } => report(out, service.set_disabled(editor, target, &id, disabled)?),
        Command::Prune { target } => {
            let before = service.orphans(&service.role_config(target));
            let outcome = service.prune_orphans(editor, target)?;
            if outcome.is_updated() {
                writeln!(out, "pruned {}", before.join(", "))?;
            }
            report(out, outcome)
        }
        Command::Reset { target } => {
            let config = service.reset(editor, target)?;
            writeln!(out, "reset {target} menu")?;
            print_config(&config, &service, out)
        }
        Command::Flags(FlagsCommand::List) => {
            let mut flags: BTreeMap<String, bool> = session
                .registry
                .referenced_flags()
                .into_iter()
                .map(|name| (name.to_string(), false))
                .collect();
            for (name, value) in session.publication.flags().iter() {
                flags.insert(name.to_string(), value);
            }
            for (name, value) in flags {
                writeln!(out, "{name} = {value}")?;
            }
            Ok(())
        }
        Command::Flags(FlagsCommand::Set { name, value }) => {
            if !editor.is_admin() {
                bail!("{editor} is not allowed to change publication flags");
            }
            let changed = session
                .publication
                .set_flag(&name, value)
                .with_context(|| format!("failed to save flag '{name}'"))?;
            writeln!(out, "{name} = {value}{}", if changed { "" } else { " (unchanged)" })?;
            Ok(())
        }
        Command::Unread(UnreadCommand::Set { source, count }) => {
            let user_id = &session.identity.user_id;
            session
                .counter()
                .set_count(user_id, &source, count)
                .with_context(|| format!("failed to save unread count for '{source}'"))?;
            writeln!(out, "{user_id}: {source} = {count}")?;
            Ok(())
        }
        Command::Edit { .. } => bail!("the editor needs an interactive terminal"),
    }
}

fn show(session: &Session, service: &NavigationService, args: ShowArgs, out: &mut dyn Write) -> Result<()> {
    let target = args.target.unwrap_or(session.identity.role);
    let config = service.role_config(target);
    let mut context = NavigationContext::new(session.identity.user_id.clone(), args.path);
    context.substitutions.extend(args.params);
    let entries = build_sidebar(&config, &context, &session.counter(), &IconRegistry);
    if entries.is_empty() {
        writeln!(out, "{target} has no navigation")?;
        return Ok(());
    }
    for entry in &entries {
        writeln!(out, "{}", sidebar_line(entry))?;
    }
    Ok(())
}

fn sidebar_line(entry: &SidebarEntry) -> String {
    let marker = if entry.active { ">" } else { " " };
    let mut line = format!("{marker} {} {:<24} {}", entry.icon, entry.label, entry.href);
    if let Some(badge) = entry.badge.as_ref() {
        line.push_str(&format!(" [{badge}]"));
    }
    if !entry.enabled {
        line.push_str(" (disabled)");
    }
    line
}

fn templates(session: &Session, target: Option<Role>, out: &mut dyn Write) -> Result<()> {
    let templates = match target {
        Some(role) => session.registry.list_templates_for_role(role),
        None => session.registry.templates.iter().collect(),
    };
    writeln!(out, "catalog version {}", session.registry.version)?;
    for template in templates {
        let roles: Vec<&str> = template.eligible_roles.iter().map(|role| role.as_str()).collect();
        let order = template.default_order.map_or_else(|| "-".to_string(), |order| order.to_string());
        writeln!(out, "{order:>2} {:<40} {:<24} {}", template.id, template.display_title(), roles.join(","))?;
    }
    Ok(())
}

fn report(out: &mut dyn Write, outcome: EditOutcome) -> Result<()> {
    if !outcome.is_updated() {
        writeln!(out, "no change")?;
        return Ok(());
    }
    let config = outcome.into_config();
    writeln!(out, "saved {} menu", config.role)?;
    for item in &config.items {
        writeln!(out, "{}", item_line(item.current_order, item.display_title(), &item.id, item.is_visible, item.is_disabled))?;
    }
    Ok(())
}

fn print_config(config: &RoleNavConfig, service: &NavigationService, out: &mut dyn Write) -> Result<()> {
    let orphans = service.orphans(config);
    for item in &config.items {
        let mut line = item_line(item.current_order, item.display_title(), &item.id, item.is_visible, item.is_disabled);
        if orphans.contains(&item.id) {
            line.push_str(" orphan");
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn item_line(order: u32, title: &str, id: &str, visible: bool, disabled: bool) -> String {
    let visibility = if visible { "shown" } else { "hidden" };
    let state = if disabled { "disabled" } else { "enabled" };
    format!("{order:>2} {title:<24} {id:<40} {visibility} {state}")
}
