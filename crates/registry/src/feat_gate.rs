//! Publication gates.
//!
//! Two kinds of rules tie the catalog to publication flags:
//! - a template-level gate (`availableWhen`) removes a template from a role's
//!   eligible set while its flag is `false`;
//! - an item-level override (`publicationOverride`) forces an item's
//!   visibility and disabled state from its flag, whatever was persisted.

use selftape_types::{ItemPresentation, NavItemState, NavItemTemplate, PublicationFlags, PublicationOverride};

/// Whether a template is offered under the given flag snapshot.
///
/// # Examples
///
/// ```rust
/// use selftape_registry::{TemplateRegistry, feat_gate::is_available};
/// use selftape_types::{COURSES_PUBLISHED, PublicationFlags};
///
/// let registry = TemplateRegistry::embedded().unwrap();
/// let my_courses = registry.template("/actor/my-courses").unwrap();
/// assert!(!is_available(my_courses, &PublicationFlags::new()));
/// assert!(is_available(my_courses, &PublicationFlags::new().with(COURSES_PUBLISHED, true)));
/// ```
pub fn is_available(template: &NavItemTemplate, flags: &PublicationFlags) -> bool {
    template.available_when.as_deref().is_none_or(|flag| flags.get(flag))
}

/// The presentation an override forces under the given flags.
pub fn forced_presentation(rule: Option<&PublicationOverride>, flags: &PublicationFlags) -> Option<ItemPresentation> {
    rule.map(|rule| rule.presentation(flags.get(&rule.flag)))
}

/// Applies the item's override, if any. Returns `true` when the item is
/// publication-controlled.
pub fn apply_override(item: &mut NavItemState, flags: &PublicationFlags) -> bool {
    match forced_presentation(item.publication_override.as_ref(), flags) {
        Some(presentation) => {
            item.apply_presentation(presentation);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateRegistry;
    use selftape_types::COURSES_PUBLISHED;

    #[test]
    fn ungated_templates_are_always_available() {
        let registry = TemplateRegistry::embedded().unwrap();
        assert!(is_available(registry.template("/sessions").unwrap(), &PublicationFlags::new()));
    }

    #[test]
    fn courses_pair_is_mutually_exclusive() {
        let registry = TemplateRegistry::embedded().unwrap();
        let courses = registry.template("/courses").unwrap();
        let coming_soon = registry.template("/courses/coming-soon").unwrap();
        for published in [true, false] {
            let flags = PublicationFlags::new().with(COURSES_PUBLISHED, published);
            let mut live = NavItemState::from_template(courses, 0);
            let mut placeholder = NavItemState::from_template(coming_soon, 1);
            assert!(apply_override(&mut live, &flags));
            assert!(apply_override(&mut placeholder, &flags));
            assert_ne!(live.is_visible, placeholder.is_visible, "published={published}");
            assert_eq!(live.is_visible, published);
            assert_eq!(!live.is_disabled, published);
        }
    }

    #[test]
    fn items_without_rules_are_untouched() {
        let registry = TemplateRegistry::embedded().unwrap();
        let mut item = NavItemState::from_template(registry.template("/messages").unwrap(), 0);
        item.is_visible = false;
        assert!(!apply_override(&mut item, &PublicationFlags::new()));
        assert!(!item.is_visible);
    }
}
