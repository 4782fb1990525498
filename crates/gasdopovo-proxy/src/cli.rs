use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gasdopovo-proxy")]
#[command(author, version, about = "Gás do Povo benefit lookup service", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,

    /// Upstream lookup URL
    #[arg(short, long, global = true, env = "GASDOPOVO_UPSTREAM")]
    pub upstream: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API (default)
    Serve {
        /// Listen address
        #[arg(short = 'l', long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },

    /// Look up one CPF and print the outcome as JSON
    Query {
        /// CPF, with or without punctuation
        cpf: String,
    },

    /// Classify a saved HTML page (use `-` for stdin) without any network access
    Classify {
        /// Path to the HTML file
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["gasdopovo-proxy"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "config.yaml");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["gasdopovo-proxy", "serve", "-l", "127.0.0.1", "-P", "9000"]);
        match cli.command {
            Some(Commands::Serve { listen, port }) => {
                assert_eq!(listen.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_query_with_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["gasdopovo-proxy", "query", "123.456.789-09", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Query { ref cpf }) if cpf == "123.456.789-09"));
    }
}
