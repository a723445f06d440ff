use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sitesmith", about = "Website revamp studio: modernize, audit, design, grow")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert legacy code (or a live site) to a modern React/Tailwind stack
    Modernize {
        /// Legacy code, a URL (with --url), or `-` to read stdin
        input: String,
        /// Treat the input as a URL and let the model inspect the live site
        #[arg(long)]
        url: bool,
        /// Source language hint (defaults to auto-detection)
        #[arg(long, default_value = sitesmith::prompt::AUTO_DETECT)]
        lang: String,
    },
    /// Security and performance audit with a 0-100 health score
    Audit {
        /// Code/system description, a URL (with --url), or `-` to read stdin
        input: String,
        #[arg(long)]
        url: bool,
    },
    /// UI/UX recommendations, optionally as a prototype component
    Design {
        /// The design vision or problem statement, or `-` to read stdin
        instruction: String,
        /// Existing site to critique against the vision
        #[arg(long)]
        url: Option<String>,
        /// Generate a prototype React component instead of recommendations
        #[arg(long)]
        code: bool,
    },
    /// Growth and SEO strategy suggestions
    Growth {
        /// Content/business description, a URL (with --url), or `-` to read stdin
        input: String,
        #[arg(long)]
        url: bool,
    },
}
