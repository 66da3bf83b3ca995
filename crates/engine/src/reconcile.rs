//! Reconciliation of templates, persisted edits and publication flags.
//!
//! Field ownership when a persisted item matches a template:
//!
//! | field | owner |
//! |-------|-------|
//! | `id`, `name`, `title`, `iconKey`, `path`, `defaultOrder`, `eligibleRoles`, `isDynamic`, `exactMatch`, `notificationSource`, `availableWhen`, `publicationOverride`, `pathDefaults` | template |
//! | `currentOrder`, `isVisible`, `isDisabled` | user |
//!
//! Publication overrides then replace `isVisible`/`isDisabled` for the items
//! they govern, whatever either side says. A persisted item whose template is
//! gated out by `availableWhen` stays in the list, hidden and disabled, with
//! the user's presentation held until the flag is set again.
//!
//! Reconciliation is a pure function: the same inputs always produce the same
//! list. Writing the result back is the caller's job.

use std::collections::{BTreeSet, HashMap, HashSet};

use selftape_registry::{TemplateRegistry, feat_gate};
use selftape_types::{NavItemState, NavItemTemplate, PublicationFlags, Role, RoleNavConfig};
use tracing::{debug, info, warn};

use crate::oracle::{PublicationOracle, snapshot};

/// Where an output item came from. Fresh items sort ahead of persisted ones
/// with the same order so an injected template lands at its `defaultOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Origin {
    Fresh,
    Persisted,
}

struct Draft {
    state: NavItemState,
    origin: Origin,
    /// Insertion position within its origin, used as the final tie-break.
    sequence: usize,
}

/// Produces the authoritative list for `role`.
pub fn reconcile(role: Role, persisted: Option<&RoleNavConfig>, registry: &TemplateRegistry, oracle: &dyn PublicationOracle) -> RoleNavConfig {
    let flags = capture_flags(persisted, registry, oracle);

    let eligible: Vec<&NavItemTemplate> = registry
        .list_templates_for_role(role)
        .into_iter()
        .filter(|template| {
            let available = feat_gate::is_available(template, &flags);
            if !available {
                debug!(role = %role, id = %template.id, "template gated out by publication flag");
            }
            available
        })
        .collect();

    let mut drafts = match persisted {
        None => eligible
            .iter()
            .enumerate()
            .map(|(position, template)| fresh_draft(template, position))
            .collect(),
        Some(config) => merge_persisted(role, config, &eligible, registry),
    };

    for draft in &mut drafts {
        apply_availability(&mut draft.state, role, registry, &flags);
        apply_publication_rule(&mut draft.state, registry, &flags);
    }

    drafts.sort_by(|left, right| {
        left.state
            .current_order
            .cmp(&right.state.current_order)
            .then(left.origin.cmp(&right.origin))
            .then(left.sequence.cmp(&right.sequence))
    });

    RoleNavConfig::new(role, registry.version, drafts.into_iter().map(|draft| draft.state).collect())
}

fn capture_flags(persisted: Option<&RoleNavConfig>, registry: &TemplateRegistry, oracle: &dyn PublicationOracle) -> PublicationFlags {
    let mut names: BTreeSet<&str> = registry.referenced_flags();
    if let Some(config) = persisted {
        for item in &config.items {
            if let Some(rule) = item.publication_override.as_ref() {
                names.insert(rule.flag.as_str());
            }
        }
    }
    snapshot(oracle, names)
}

fn fresh_draft(template: &NavItemTemplate, position: usize) -> Draft {
    let order = template.default_order.unwrap_or(position as u32);
    Draft {
        state: NavItemState::from_template(template, order),
        origin: Origin::Fresh,
        sequence: position,
    }
}

fn merge_persisted(role: Role, config: &RoleNavConfig, eligible: &[&NavItemTemplate], registry: &TemplateRegistry) -> Vec<Draft> {
    if config.catalog_version != registry.version {
        info!(
            role = %role,
            persisted = config.catalog_version,
            current = registry.version,
            "navigation catalog changed since last save; reconciling"
        );
    }

    let mut persisted_by_id: HashMap<&str, (usize, &NavItemState)> = HashMap::new();
    let mut duplicates = HashSet::new();
    for (index, item) in config.items.iter().enumerate() {
        if persisted_by_id.contains_key(item.id.as_str()) {
            warn!(role = %role, id = %item.id, "duplicate persisted navigation item dropped");
            duplicates.insert(index);
            continue;
        }
        persisted_by_id.insert(item.id.as_str(), (index, item));
    }

    let mut drafts = Vec::with_capacity(eligible.len() + config.items.len());
    for (position, template) in eligible.iter().enumerate() {
        match persisted_by_id.get(template.id.as_str()) {
            Some((index, item)) => {
                let mut state = (*item).clone();
                state.refresh_from_template(template);
                drafts.push(Draft {
                    state,
                    origin: Origin::Persisted,
                    sequence: *index,
                });
            }
            None => {
                debug!(role = %role, id = %template.id, "injecting new navigation template");
                drafts.push(fresh_draft(template, position));
            }
        }
    }

    let eligible_ids: HashSet<&str> = eligible.iter().map(|template| template.id.as_str()).collect();
    for (index, item) in config.items.iter().enumerate() {
        if duplicates.contains(&index) || eligible_ids.contains(item.id.as_str()) {
            continue;
        }
        let mut state = item.clone();
        match registry.template(&item.id).filter(|template| template.is_eligible(role)) {
            Some(template) => {
                debug!(role = %role, id = %item.id, "keeping gated navigation item");
                state.refresh_from_template(template);
            }
            None => debug!(role = %role, id = %item.id, "preserving orphaned navigation item"),
        }
        drafts.push(Draft {
            state,
            origin: Origin::Persisted,
            sequence: index,
        });
    }
    drafts
}

/// Suppresses items whose template is gated out for `role` and releases
/// them once the gate opens again.
fn apply_availability(state: &mut NavItemState, role: Role, registry: &TemplateRegistry, flags: &PublicationFlags) {
    match registry.template(&state.id).filter(|template| template.is_eligible(role)) {
        Some(template) if !feat_gate::is_available(template, flags) => state.suppress(),
        _ => state.release(),
    }
}

/// Forces presentation for publication-controlled items. Orphans keep their
/// persisted fields verbatim but follow the catalog's current rule when the
/// catalog still knows the id.
fn apply_publication_rule(state: &mut NavItemState, registry: &TemplateRegistry, flags: &PublicationFlags) {
    let rule = registry
        .template(&state.id)
        .and_then(|template| template.publication_override.as_ref())
        .or(state.publication_override.as_ref());
    if let Some(presentation) = feat_gate::forced_presentation(rule, flags) {
        state.apply_presentation(presentation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selftape_types::COURSES_PUBLISHED;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::embedded().unwrap()
    }

    #[test]
    fn first_run_synthesizes_in_default_order() {
        let config = reconcile(Role::Tutor, None, &registry(), &PublicationFlags::new());
        assert_eq!(
            config.ids(),
            vec![
                "/tutor/dashboard",
                "/tutor/reviews",
                "/tutor/themes/:themeId/submissions",
                "/tutor/availability",
                "/courses",
                "/courses/coming-soon",
                "/sessions",
                "/messages",
                "/settings/profile",
            ]
        );
        assert!(config.items.iter().filter(|item| !item.is_publication_controlled()).all(|item| item.is_visible && !item.is_disabled));
        assert_eq!(config.catalog_version, registry().version);
    }

    #[test]
    fn gated_template_is_absent_until_published() {
        let unpublished = reconcile(Role::Actor, None, &registry(), &PublicationFlags::new());
        assert!(unpublished.item("/actor/my-courses").is_none());

        let published = reconcile(Role::Actor, None, &registry(), &PublicationFlags::new().with(COURSES_PUBLISHED, true));
        assert!(published.item("/actor/my-courses").is_some());
    }

    #[test]
    fn persisted_override_fields_are_never_trusted() {
        let flags = PublicationFlags::new();
        let mut persisted = reconcile(Role::Actor, None, &registry(), &flags);
        let coming_soon = persisted.item_mut("/courses/coming-soon").unwrap();
        coming_soon.is_visible = false;
        coming_soon.is_disabled = false;

        let config = reconcile(Role::Actor, Some(&persisted), &registry(), &flags);
        let coming_soon = config.item("/courses/coming-soon").unwrap();
        assert!(coming_soon.is_visible);
        assert!(coming_soon.is_disabled);
    }

    #[test]
    fn gated_item_is_suppressed_and_restored() {
        let published = PublicationFlags::new().with(COURSES_PUBLISHED, true);
        let mut saved = reconcile(Role::Actor, None, &registry(), &published);
        saved.item_mut("/actor/my-courses").unwrap().is_disabled = true;

        let unpublished = reconcile(Role::Actor, Some(&saved), &registry(), &PublicationFlags::new());
        let gated = unpublished.item("/actor/my-courses").unwrap();
        assert!(!gated.is_visible);
        assert!(gated.is_disabled);
        assert!(gated.is_suppressed());
        assert_eq!(reconcile(Role::Actor, Some(&unpublished), &registry(), &PublicationFlags::new()), unpublished);

        let republished = reconcile(Role::Actor, Some(&unpublished), &registry(), &published);
        let restored = republished.item("/actor/my-courses").unwrap();
        assert!(restored.is_visible);
        assert!(restored.is_disabled, "user choice survives the round trip");
        assert!(!restored.is_suppressed());
    }

    #[test]
    fn duplicate_persisted_ids_keep_first() {
        let flags = PublicationFlags::new();
        let mut persisted = reconcile(Role::Admin, None, &registry(), &flags);
        let mut duplicate = persisted.items[0].clone();
        duplicate.is_visible = false;
        persisted.items.push(duplicate);

        let config = reconcile(Role::Admin, Some(&persisted), &registry(), &flags);
        let first_id = persisted.items[0].id.clone();
        assert_eq!(config.items.iter().filter(|item| item.id == first_id).count(), 1);
        assert!(config.item(&first_id).unwrap().is_visible);
    }

    #[test]
    fn role_without_templates_reconciles_to_empty() {
        let config = reconcile(Role::Guest, None, &registry(), &PublicationFlags::new());
        assert!(config.is_empty());
    }
}
