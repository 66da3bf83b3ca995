use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use selftape_types::Role;

/// Inspect and edit the per-role sidebar menus.
///
/// Without a subcommand the interactive menu editor opens.
#[derive(Debug, Parser)]
#[command(name = "selftape-nav", version, about)]
pub struct Cli {
    /// Key-value store file; defaults to settings, `SELFTAPE_STORE_PATH`, then the config directory
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Signed-in user id, used for unread badges
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Signed-in role; only admins may edit menus
    #[arg(long, global = true)]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the sidebar a role sees
    Show(ShowArgs),

    /// Print a role's reconciled configuration as JSON
    Dump {
        /// Role to dump; defaults to the signed-in role
        target: Option<Role>,
    },

    /// List catalog templates offered to a role
    Templates {
        /// Role to list; all templates when omitted
        target: Option<Role>,
    },

    /// Move the item at FROM to TO in a role's menu
    Reorder { target: Role, from: usize, to: usize },

    /// Show or hide an item
    Visibility {
        target: Role,
        id: String,
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        visible: bool,
    },

    /// Disable or enable an item
    Disabled {
        target: Role,
        id: String,
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        disabled: bool,
    },

    /// Discard a role's edits and regenerate its menu from the catalog
    Reset { target: Role },

    /// Remove items whose template no longer offers the role
    Prune { target: Role },

    /// Publication flags
    #[command(subcommand)]
    Flags(FlagsCommand),

    /// Unread notification counts behind sidebar badges
    #[command(subcommand)]
    Unread(UnreadCommand),

    /// Open the interactive menu editor
    Edit {
        /// Role whose menu opens first
        #[arg(long)]
        target: Option<Role>,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Role whose sidebar to render; defaults to the signed-in role
    pub target: Option<Role>,

    /// Current location, used to mark the active entry
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Placeholder value for dynamic links, as NAME=VALUE (repeatable)
    #[arg(long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Subcommand)]
pub enum FlagsCommand {
    /// Print every known flag and its value
    List,
    /// Set a flag
    Set {
        name: String,
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        value: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum UnreadCommand {
    /// Set the unread count for a notification source of the signed-in user
    Set { source: String, count: u32 },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edits_with_global_flags() {
        let cli = Cli::try_parse_from(["selftape-nav", "visibility", "tutor", "/sessions", "off", "--role", "admin"]).unwrap();
        assert_eq!(cli.role, Some(Role::Admin));
        match cli.command {
            Some(Command::Visibility { target, id, visible }) => {
                assert_eq!(target, Role::Tutor);
                assert_eq!(id, "/sessions");
                assert!(!visible);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn boolean_positionals_take_a_value() {
        let cli = Cli::try_parse_from(["selftape-nav", "disabled", "actor", "/sessions", "true"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Disabled { disabled: true, .. })));

        let cli = Cli::try_parse_from(["selftape-nav", "flags", "set", "coursesPublished", "no"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Flags(FlagsCommand::Set { value: false, .. }))));

        assert!(Cli::try_parse_from(["selftape-nav", "visibility", "actor", "/sessions"]).is_err());
        assert!(Cli::try_parse_from(["selftape-nav", "visibility", "actor", "/sessions", "maybe"]).is_err());
    }

    #[test]
    fn show_accepts_dynamic_parameters() {
        let cli = Cli::try_parse_from(["selftape-nav", "show", "actor", "--param", "themeId=t-1", "--path", "/messages"]).unwrap();
        let Some(Command::Show(args)) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.params, vec![("themeId".to_string(), "t-1".to_string())]);
        assert_eq!(args.path, "/messages");
        assert!(Cli::try_parse_from(["selftape-nav", "show", "--param", "nope"]).is_err());
    }

    #[test]
    fn no_subcommand_means_editor() {
        let cli = Cli::try_parse_from(["selftape-nav"]).unwrap();
        assert!(cli.command.is_none());
    }
}
