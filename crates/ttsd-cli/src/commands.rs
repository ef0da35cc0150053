//! Subcommand definitions.

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP service (default)
    #[default]
    Serve,
    /// Print `<semver>.<branch>.<commit>.<build_date>.<arch>` and exit
    Version,
}
