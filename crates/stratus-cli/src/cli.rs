//! Command-line surface

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "stratus")]
#[command(about = "Manage stratus cloud firewalls and object stores")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Region to operate in (overrides STRATUS_REGION and the config file)
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,

    /// Comma separated fields for custom output, e.g. id,name
    #[arg(short, long, global = true)]
    pub fields: Option<String>,

    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// API base URL
    #[arg(long, global = true, hide = true)]
    pub api_url: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text
    Human,
    /// JSON
    Json,
    /// Tab separated values of --fields
    Custom,
}

impl OutputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage object stores
    #[command(visible_aliases = ["objectstores", "object-store", "obs"])]
    Objectstore {
        #[command(subcommand)]
        command: ObjectStoreCommand,
    },

    /// Manage firewalls
    #[command(visible_aliases = ["firewalls", "fw"])]
    Firewall {
        #[command(subcommand)]
        command: FirewallCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ObjectStoreCommand {
    /// List object stores
    #[command(visible_alias = "ls")]
    List,

    /// Show an object store
    #[command(visible_aliases = ["get", "inspect"])]
    Show {
        /// ID or name
        object_store: String,
    },

    /// Create an object store
    ///
    /// Size is in GB and must be a multiple of 500, starting from 500.
    #[command(visible_aliases = ["new", "add"])]
    Create {
        /// Name of the object store
        name: String,

        /// Maximum size in GB
        #[arg(short, long, default_value_t = 500)]
        size: u64,

        /// Maximum number of objects (unlimited when omitted)
        #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
        max_objects: Option<u64>,

        /// Wait until the object store is ready
        #[arg(short, long)]
        wait: bool,

        /// Stop waiting after this many seconds
        #[arg(long, value_name = "SECS", requires = "wait")]
        wait_timeout: Option<u64>,
    },

    /// Resize an object store
    Update {
        /// ID or name
        object_store: String,

        /// New maximum size in GB
        #[arg(short, long)]
        size: u64,

        /// Wait until the object store is ready
        #[arg(short, long)]
        wait: bool,

        /// Stop waiting after this many seconds
        #[arg(long, value_name = "SECS", requires = "wait")]
        wait_timeout: Option<u64>,
    },

    /// Delete object stores
    #[command(visible_aliases = ["rm", "delete"])]
    Remove {
        /// IDs or names
        #[arg(required = true)]
        object_stores: Vec<String>,
    },

    /// Object store credentials
    #[command(visible_alias = "credentials")]
    Credential {
        #[command(subcommand)]
        command: CredentialCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CredentialCommand {
    /// Print the secret key paired with an access key
    Secret {
        /// Access key ID
        #[arg(long)]
        access_key: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FirewallCommand {
    /// List firewalls
    #[command(visible_alias = "ls")]
    List,

    /// Create a firewall
    #[command(visible_aliases = ["new", "add"])]
    Create {
        /// Name of the firewall
        name: String,

        /// Network ID or name (defaults to the region's default network)
        #[arg(short, long)]
        network: Option<String>,

        /// Whether the provider adds its default rules
        #[arg(long, value_name = "BOOL")]
        create_rules: Option<bool>,
    },

    /// Rename a firewall
    #[command(visible_alias = "rename")]
    Update {
        /// ID or name
        firewall: String,

        /// New name
        new_name: String,
    },

    /// Delete firewalls
    #[command(visible_aliases = ["rm", "delete"])]
    Remove {
        /// IDs or names
        #[arg(required = true)]
        firewalls: Vec<String>,
    },

    /// Manage firewall rules
    #[command(visible_alias = "rules")]
    Rule {
        #[command(subcommand)]
        command: RuleCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum RuleCommand {
    /// List the rules of a firewall
    #[command(visible_alias = "ls")]
    List {
        /// Firewall ID or name
        firewall: String,
    },

    /// Add a rule to a firewall
    #[command(visible_aliases = ["new", "add"])]
    Create {
        /// Firewall ID or name
        firewall: String,

        /// Protocol: tcp, udp or icmp
        #[arg(short, long)]
        protocol: String,

        /// First port
        #[arg(short = 's', long = "startport")]
        start_port: Option<String>,

        /// Last port (defaults to the start port)
        #[arg(short = 'e', long = "endport")]
        end_port: Option<String>,

        /// CIDR block, repeatable or comma separated (defaults to 0.0.0.0/0)
        #[arg(short, long, action = ArgAction::Append)]
        cidr: Vec<String>,

        /// ingress or egress
        #[arg(short, long)]
        direction: Option<String>,

        /// allow or deny
        #[arg(short, long)]
        action: Option<String>,

        /// Display label
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Delete a rule from a firewall
    #[command(visible_aliases = ["rm", "delete"])]
    Remove {
        /// Firewall ID or name
        firewall: String,

        /// Rule ID
        rule_id: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stratus").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_objectstore_create_defaults() {
        let cli = parse(&["objectstore", "create", "backups"]);
        assert_eq!(cli.output, OutputFormat::Human);
        match cli.command {
            Command::Objectstore {
                command:
                    ObjectStoreCommand::Create {
                        name,
                        size,
                        max_objects,
                        wait,
                        wait_timeout,
                    },
            } => {
                assert_eq!(name, "backups");
                assert_eq!(size, 500);
                assert_eq!(max_objects, None);
                assert!(!wait);
                assert_eq!(wait_timeout, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_aliases_and_global_flags() {
        let cli = parse(&[
            "obs", "new", "media", "--size", "1000", "--wait", "-o", "json", "--pretty", "-r",
            "lon1",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.pretty);
        assert_eq!(cli.region.as_deref(), Some("lon1"));
        assert!(matches!(
            cli.command,
            Command::Objectstore {
                command: ObjectStoreCommand::Create { size: 1000, wait: true, .. }
            }
        ));
    }

    #[test]
    fn test_max_objects_must_be_positive() {
        let cli = parse(&["objectstore", "create", "logs", "--max-objects", "2000"]);
        assert!(matches!(
            cli.command,
            Command::Objectstore {
                command: ObjectStoreCommand::Create { max_objects: Some(2000), .. }
            }
        ));
        assert!(
            Cli::try_parse_from(["stratus", "objectstore", "create", "logs", "--max-objects", "0"])
                .is_err()
        );
    }

    #[test]
    fn test_credential_secret() {
        let cli = parse(&["obs", "credential", "secret", "--access-key=AKIA123"]);
        match cli.command {
            Command::Objectstore {
                command:
                    ObjectStoreCommand::Credential {
                        command: CredentialCommand::Secret { access_key },
                    },
            } => assert_eq!(access_key, "AKIA123"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["stratus", "objectstore", "credential", "secret"]).is_err());
    }

    #[test]
    fn test_wait_timeout_requires_wait() {
        let result =
            Cli::try_parse_from(["stratus", "objectstore", "create", "x", "--wait-timeout", "60"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_requires_a_target() {
        assert!(Cli::try_parse_from(["stratus", "objectstore", "rm"]).is_err());
        let cli = parse(&["fw", "delete", "web", "db", "-y"]);
        assert!(cli.yes);
        assert!(matches!(
            cli.command,
            Command::Firewall {
                command: FirewallCommand::Remove { ref firewalls }
            } if firewalls.len() == 2
        ));
    }

    #[test]
    fn test_rule_create_flags() {
        let cli = parse(&[
            "firewall",
            "rules",
            "add",
            "web",
            "-p",
            "tcp",
            "-s",
            "80",
            "-e",
            "90",
            "-c",
            "10.0.0.0/8",
            "-c",
            "192.168.0.0/16",
            "-d",
            "egress",
            "-a",
            "deny",
            "-l",
            "http",
        ]);
        match cli.command {
            Command::Firewall {
                command:
                    FirewallCommand::Rule {
                        command:
                            RuleCommand::Create {
                                firewall,
                                protocol,
                                start_port,
                                end_port,
                                cidr,
                                direction,
                                action,
                                label,
                            },
                    },
            } => {
                assert_eq!(firewall, "web");
                assert_eq!(protocol, "tcp");
                assert_eq!(start_port.as_deref(), Some("80"));
                assert_eq!(end_port.as_deref(), Some("90"));
                assert_eq!(cidr, vec!["10.0.0.0/8", "192.168.0.0/16"]);
                assert_eq!(direction.as_deref(), Some("egress"));
                assert_eq!(action.as_deref(), Some("deny"));
                assert_eq!(label.as_deref(), Some("http"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = parse(&["-vvv", "firewall", "list"]);
        assert_eq!(cli.verbose, 3);
    }
}
