mod cli;

use std::io::Read;
use std::sync::Arc;

use clap::Parser;

use sitesmith::config::Config;
use sitesmith::engines::{Engines, ShapedResult};
use sitesmith::gateway::gemini::GeminiGateway;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    dotenvy::dotenv().ok();

    let args = Cli::parse();

    let config = Config::load();
    let engines = Engines::new(Arc::new(GeminiGateway::new(&config)));

    let result = match args.command {
        Command::Modernize { input, url, lang } => {
            let content = read_input(&input)?;
            engines
                .modernize(&content, &lang, url)
                .await
                .map(ShapedResult::Code)
        }
        Command::Audit { input, url } => {
            let content = read_input(&input)?;
            engines.audit(&content, url).await.map(ShapedResult::Audit)
        }
        Command::Design {
            instruction,
            url,
            code,
        } => {
            let instruction = read_input(&instruction)?;
            engines
                .design_suggest(&instruction, url.as_deref(), code)
                .await
                .map(|markdown| ShapedResult::Text { markdown })
        }
        Command::Growth { input, url } => {
            let content = read_input(&input)?;
            engines
                .growth_suggest(&content, url)
                .await
                .map(|markdown| ShapedResult::Text { markdown })
        }
    };

    // Errors are rendered distinctly, never folded into an empty result.
    match result {
        Ok(shaped) => {
            render(&shaped);
            Ok(())
        }
        Err(e) => {
            tracing::error!("engine call failed: {e}");
            anyhow::bail!(e.user_message())
        }
    }
}

/// `-` reads stdin so code can be piped in; anything else is used verbatim.
fn read_input(arg: &str) -> anyhow::Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(arg.to_string())
    }
}

fn render(result: &ShapedResult) {
    match result {
        ShapedResult::Code(suggestion) => {
            println!("{}\n", suggestion.code);
            println!("---\n{}", suggestion.explanation);
        }
        ShapedResult::Audit(report) => {
            println!("Health score: {}/100\n", report.score);
            println!("{}", report.markdown);
        }
        ShapedResult::Text { markdown } => println!("{markdown}"),
    }
}
