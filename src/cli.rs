use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use metaform::Flavor;

/// Metaform - renders serverless build meta as infrastructure templates
#[derive(Parser, Debug)]
#[command(name = "metaform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the build meta as one or more template documents
    Generate(GenerateArgs),

    /// Report which entries each flavor converts, skips or ignores
    Check {
        /// Build meta JSON file
        #[arg(short, long)]
        build_meta: PathBuf,

        /// Flavor(s) to check against
        #[arg(short, long, value_enum, default_value = "all")]
        flavor: Flavor,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Build meta JSON file
    #[arg(short, long)]
    pub build_meta: PathBuf,

    /// Template flavor to generate
    #[arg(short, long, value_enum, default_value = "terraform")]
    pub flavor: Flavor,

    /// Directory the template files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file (overrides ./metaform.toml and the user config)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the document instead of writing it (single flavor only)
    #[arg(long, conflicts_with = "output_dir")]
    pub stdout: bool,

    /// Credentials profile for the provider block
    #[arg(long)]
    pub profile: Option<String>,

    /// Region for the provider block
    #[arg(long)]
    pub region: Option<String>,

    /// Bucket holding lambda deployment bundles
    #[arg(long)]
    pub bundle_bucket: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["metaform", "generate", "--build-meta", "meta.json"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.flavor, Flavor::Terraform);
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(!args.stdout);
    }

    #[test]
    fn flavor_accepts_short_alias() {
        let cli = Cli::try_parse_from([
            "metaform", "generate", "-b", "meta.json", "--flavor", "cf", "-vv",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.flavor, Flavor::CloudFormation);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn stdout_conflicts_with_output_dir() {
        let result = Cli::try_parse_from([
            "metaform", "generate", "-b", "meta.json", "--stdout", "-o", "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn check_defaults_to_all_flavors() {
        let cli = Cli::try_parse_from(["metaform", "--json", "check", "-b", "meta.json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Check {
                flavor: Flavor::All,
                ..
            }
        ));
    }
}
