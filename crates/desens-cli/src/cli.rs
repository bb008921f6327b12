use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "desens")]
#[command(about = "Redact names, places and organizations from documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a document or every document under a directory
    Run(Box<RunArgs>),

    /// Decrypt .enc outputs back to text
    Decrypt {
        /// An .enc file or a directory of them
        input: PathBuf,

        /// Key used when the outputs were written
        #[arg(long)]
        key_file: PathBuf,
    },

    /// Write a fresh encryption key
    Keygen {
        key_file: PathBuf,

        /// Replace an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Config {
        /// Print only the config file location
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input file or directory
    pub input: PathBuf,

    /// Output directory (created if missing)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Config file (default: the user config location)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of redaction passes
    #[arg(long)]
    pub passes: Option<usize>,

    /// Maximum characters per recognizer call
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Labels to redact, e.g. PERSON,LOCATION
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Replacement marker
    #[arg(long)]
    pub mask: Option<String>,

    /// Encrypt outputs with AES-256-GCM
    #[arg(long)]
    pub encrypt: bool,

    /// Key file for --encrypt (generated when missing)
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub recognizer: Option<RecognizerArg>,

    /// Lexicon TOML for the lexicon recognizer
    #[arg(long)]
    pub lexicon: Option<PathBuf>,

    /// NER API token
    #[arg(long, env = "DESENS_NER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Name outputs with the random token only
    #[arg(long)]
    pub no_basename: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecognizerArg {
    Http,
    Lexicon,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Run(args) => *args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_defaults() {
        let args = run_args(&["desens", "run", "docs", "-o", "out"]);
        assert_eq!(args.input, PathBuf::from("docs"));
        assert_eq!(args.output, PathBuf::from("out"));
        assert!(args.passes.is_none());
        assert!(!args.encrypt);
        assert!(!args.no_basename);
    }

    #[test]
    fn test_run_overrides() {
        let args = run_args(&[
            "desens",
            "run",
            "report.docx",
            "--output",
            "out",
            "--passes",
            "1",
            "--labels",
            "PERSON,LOCATION",
            "--recognizer",
            "lexicon",
            "--lexicon",
            "names.toml",
            "--encrypt",
        ]);
        assert_eq!(args.passes, Some(1));
        assert_eq!(
            args.labels,
            Some(vec!["PERSON".to_string(), "LOCATION".to_string()])
        );
        assert_eq!(args.recognizer, Some(RecognizerArg::Lexicon));
        assert_eq!(args.lexicon, Some(PathBuf::from("names.toml")));
        assert!(args.encrypt);
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["desens", "run", "docs"]).is_err());
    }

    #[test]
    fn test_keygen_and_decrypt() {
        let cli = Cli::try_parse_from(["desens", "keygen", "k.key", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Keygen { force: true, .. }));

        let cli =
            Cli::try_parse_from(["desens", "-v", "decrypt", "out", "--key-file", "k.key"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Decrypt { .. }));
    }
}
