//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cheat menu bundler with a live dev loop
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version (`-V` is taken by --verbose)
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: cheat-menu.toml)
    #[arg(short = 'C', long, global = true, default_value = "cheat-menu.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scaffold a new cheat menu project
    #[command(visible_alias = "i")]
    Init {
        /// Project directory (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Menu title (prompted for when omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Package manager used to install dependencies
        #[arg(short, long, value_enum, default_value_t = PackageManager::Npm)]
        package_manager: PackageManager,

        /// Only write files, do not install dependencies
        #[arg(short, long)]
        skip_install: bool,
    },

    /// Bundle the menu once and write it to the output directory
    #[command(visible_alias = "b")]
    Build {
        /// Also write a `javascript:` bookmarklet next to the bundle
        #[arg(short, long)]
        generate_bookmarklet: bool,
    },

    /// Watch sources and push every rebuild to connected pages
    ///
    /// The push server listens on 127.0.0.1 only. It does not authenticate
    /// clients or check origins: any local page running the snippet gets
    /// every bundle.
    #[command(visible_alias = "d")]
    Dev {
        /// Port for the live push server
        #[arg(short, long)]
        port: Option<u16>,

        /// Print the delivery snippet instead of copying it
        #[arg(long)]
        no_clipboard: bool,
    },
}

/// Supported package managers for `init`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Executable name.
    pub const fn program(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// Arguments that add `packages` as dependencies.
    pub fn add_args<'a>(self, packages: &[&'a str], dev: bool) -> Vec<&'a str> {
        let mut args = match self {
            Self::Npm => vec!["install"],
            Self::Yarn | Self::Pnpm => vec!["add"],
        };
        if dev {
            args.push("-D");
        }
        args.extend_from_slice(packages);
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chenu").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_short_is_lowercase() {
        let err = Cli::try_parse_from(["chenu", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_build_alias_and_flag() {
        let cli = parse(&["b", "--generate-bookmarklet"]);
        assert!(matches!(
            cli.command,
            Commands::Build {
                generate_bookmarklet: true
            }
        ));
        assert_eq!(cli.config, PathBuf::from("cheat-menu.toml"));
    }

    #[test]
    fn test_dev_options() {
        let cli = parse(&["-C", "other.toml", "dev", "--port", "5000", "--no-clipboard"]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        match cli.command {
            Commands::Dev { port, no_clipboard } => {
                assert_eq!(port, Some(5000));
                assert!(no_clipboard);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["d", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Dev { .. }));
    }

    #[test]
    fn test_init_defaults() {
        let cli = parse(&["init", "my-menu"]);
        match cli.command {
            Commands::Init {
                dir,
                title,
                package_manager,
                skip_install,
            } => {
                assert_eq!(dir, Some(PathBuf::from("my-menu")));
                assert_eq!(title, None);
                assert_eq!(package_manager, PackageManager::Npm);
                assert!(!skip_install);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_init_package_manager() {
        let cli = parse(&["init", "--package-manager", "pnpm", "--skip-install"]);
        assert!(matches!(
            cli.command,
            Commands::Init {
                package_manager: PackageManager::Pnpm,
                skip_install: true,
                ..
            }
        ));
    }

    #[test]
    fn test_add_args() {
        assert_eq!(
            PackageManager::Npm.add_args(&["chenu"], false),
            vec!["install", "chenu"]
        );
        assert_eq!(
            PackageManager::Yarn.add_args(&["esbuild"], true),
            vec!["add", "-D", "esbuild"]
        );
    }
}
