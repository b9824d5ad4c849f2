//! Sitescope CLI
//!
//! Command-line front end for the website content analyses: full-site topic
//! classification and the blog-to-website ratio.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sitescope::{analyze_blog_ratio, analyze_topics, AnalysisConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sitescope")]
#[command(about = "Analyze website structure and classify site content into topics using AI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a site's URLs into its main topics
    Topics {
        /// Domain to analyze (e.g. example.com)
        #[arg(short, long)]
        domain: String,

        /// Output as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Compute the blog-to-website content ratio
    BlogRatio {
        /// Domain to analyze (e.g. example.com)
        #[arg(short, long)]
        domain: String,

        /// Output as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load .env file if present
    dotenvy::dotenv().ok();
    let config = AnalysisConfig::from_env()?;

    match cli.command {
        Commands::Topics { domain, json } => {
            info!("Running topic analysis for: {}", domain);
            let analysis = analyze_topics(&config, &domain).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("=== Topic Analysis: {} ===\n", analysis.domain);
                println!("Total URLs discovered: {}", analysis.total_urls);
                println!("Valid URLs:            {}", analysis.valid_urls);
                println!("URLs with keywords:    {}", analysis.urls_with_keywords);
                println!();

                if analysis.topics.is_empty() {
                    println!("No topics found for this site.");
                } else {
                    println!("Topics:");
                    for topic in &analysis.topics {
                        println!("  {} ({} pages)", topic.name, topic.count);
                        if let Some(description) = &topic.description {
                            println!("    {}", description);
                        }
                    }
                    if let Some(count) = analysis.outlier_count {
                        println!("\nOutliers: {}", count);
                    }
                }
            }
        }

        Commands::BlogRatio { domain, json } => {
            info!("Running blog ratio analysis for: {}", domain);
            let ratio = analyze_blog_ratio(&config, &domain).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&ratio)?);
            } else {
                println!("=== Blog Ratio: {} ===\n", ratio.domain);
                println!("Total URLs:   {}", ratio.total_urls);
                println!(
                    "Blog:         {} ({}%)",
                    ratio.blog_urls, ratio.blog_percentage
                );
                println!(
                    "Website:      {} ({}%)",
                    ratio.website_urls, ratio.website_percentage
                );
                println!();

                println!("Website folders:");
                for folder in &ratio.website_folders {
                    println!("  {} ({} pages)", folder.folder, folder.count);
                    for topic in &folder.topics {
                        println!("    - {} ({})", topic.name, topic.count);
                    }
                }

                if !ratio.blog_topics.is_empty() {
                    println!("\nBlog topics:");
                    for topic in &ratio.blog_topics {
                        println!("  - {} ({})", topic.name, topic.count);
                    }
                }
            }
        }
    }

    Ok(())
}
