//! Influmatch CLI - browse influencers and manage campaigns
//!
//! # Main Commands
//!
//! ```bash
//! influmatch serve                          # Start HTTP server (port 3000)
//! influmatch search beauty --location cape  # Search the catalog
//! influmatch campaigns list                 # Campaigns, newest first
//! ```
//!
//! # Campaign Wizard
//!
//! ```bash
//! influmatch draft set basics basics.json   # Save a step from a JSON file
//! influmatch draft next basics              # Validate and move on
//! influmatch draft show review              # Merged summary
//! influmatch draft submit                   # Create the campaign
//! ```

use clap::{Parser, Subcommand};
use influmatch::search::Bounds;
use influmatch::{
    filter_influencers, Campaign, Config, DraftAssembler, DraftError, FileStore, FilterCriteria,
    KeyValueStore, WizardStep, CATALOG,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "influmatch")]
#[command(about = "Connect brands with influencers", long_about = None)]
struct Cli {
    /// Storage directory (default: $INFLUMATCH_STORAGE_DIR or .influmatch/storage)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default: $INFLUMATCH_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search and filter the influencer catalog
    Search {
        /// Free-text query against name and category
        #[arg(default_value = "")]
        query: String,

        /// Category chip
        #[arg(long)]
        chip: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        rate_min: Option<u64>,

        #[arg(long)]
        rate_max: Option<u64>,

        #[arg(long)]
        audience_min: Option<u64>,

        #[arg(long)]
        audience_max: Option<u64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Work on the campaign draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Manage created campaigns
    Campaigns {
        #[command(subcommand)]
        action: CampaignAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Show a step (basics, details, budget, review)
    Show {
        #[arg(default_value = "review")]
        step: String,
    },

    /// Replace a step's data with the contents of a JSON file
    Set {
        step: String,
        file: PathBuf,
    },

    /// Validate a step and print the next one
    Next {
        step: String,
    },

    /// Create the campaign from the draft
    Submit,

    /// Discard the draft
    Clear,
}

#[derive(Subcommand)]
enum CampaignAction {
    /// List campaigns, newest first
    List,

    /// Show one campaign as JSON
    Show {
        id: String,
    },

    /// Change a campaign's name
    Rename {
        id: String,
        name: String,
    },

    /// Mark a campaign completed
    End {
        id: String,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load().with_overrides(None, cli.storage_dir);

    let result = match cli.command {
        Commands::Serve { port } => cmd_serve(config.with_overrides(port, None)).await,

        Commands::Search {
            query,
            chip,
            category,
            location,
            rate_min,
            rate_max,
            audience_min,
            audience_max,
            json,
        } => {
            let range = |min: Option<u64>, max: Option<u64>| {
                (min.is_some() || max.is_some()).then(|| Bounds::new(min.unwrap_or(0), max))
            };
            let criteria = FilterCriteria {
                location,
                category,
                rate_range: range(rate_min, rate_max),
                audience_range: range(audience_min, audience_max),
                platforms: None,
            };
            cmd_search(&query, chip.as_deref(), &criteria, json)
        }

        Commands::Draft { action } => cmd_draft(&config, action).await,

        Commands::Campaigns { action } => cmd_campaigns(&config, action).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn assembler(config: &Config) -> DraftAssembler {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::with_dir(&config.storage_dir));
    DraftAssembler::new(store)
}

fn parse_step(raw: &str) -> Result<WizardStep, Box<dyn std::error::Error>> {
    WizardStep::parse(raw).ok_or_else(|| DraftError::UnknownStep(raw.to_string()).into())
}

async fn cmd_serve(config: Config) -> CliResult {
    influmatch::server::start_server(config).await
}

fn cmd_search(query: &str, chip: Option<&str>, criteria: &FilterCriteria, json: bool) -> CliResult {
    let warnings = criteria.validate();
    if !warnings.is_empty() {
        for w in &warnings {
            eprintln!("⚠️  {}: {}", w.field, w.message);
        }
        return Err("Filter ranges are invalid".into());
    }

    let results = filter_influencers(CATALOG.all(), query, chip, criteria);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    eprintln!("🔎 {} of {} influencers match\n", results.len(), CATALOG.len());
    for i in results {
        println!(
            "  {:>3}  {:<12} {:<26} {:<12} {:>8} followers  {}",
            i.id, i.name, i.category, i.rate, i.audience, i.location
        );
    }
    Ok(())
}

async fn cmd_draft(config: &Config, action: DraftAction) -> CliResult {
    let drafts = assembler(config);

    match action {
        DraftAction::Show { step } => {
            let step = parse_step(&step)?;
            let value = drafts.load_value(step).await;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        DraftAction::Set { step, file } => {
            let step = parse_step(&step)?;
            let value = read_json(&file)?;
            let saved = drafts.save_value(step, value).await?;
            eprintln!("💾 Saved {} step", step.name());
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }

        DraftAction::Next { step } => {
            let step = parse_step(&step)?;
            match drafts.advance(step).await {
                Ok(next) => eprintln!("✅ {} complete, next: {}", step.name(), next.name()),
                Err(DraftError::Invalid(errors)) => {
                    eprintln!("❌ {} is incomplete:", step.name());
                    for e in &errors {
                        eprintln!("   - {}: {}", e.field, e.message);
                    }
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        DraftAction::Submit => {
            let campaign = drafts.submit().await?;
            eprintln!("✅ Campaign created: {} ({})", campaign.title, campaign.id);
        }

        DraftAction::Clear => {
            drafts.clear().await?;
            eprintln!("🗑️  Draft discarded");
        }
    }

    Ok(())
}

async fn cmd_campaigns(config: &Config, action: CampaignAction) -> CliResult {
    let drafts = assembler(config);
    let campaigns = drafts.campaigns();

    match action {
        CampaignAction::List => {
            let list = campaigns.list().await;
            if list.is_empty() {
                eprintln!("📋 No campaigns yet.");
                eprintln!("   Use 'influmatch draft' to create one.");
                return Ok(());
            }

            eprintln!("📋 Campaigns ({}):\n", list.len());
            for c in &list {
                print_campaign_line(c);
            }
        }

        CampaignAction::Show { id } => {
            let campaign = campaigns.get(&id).await?;
            println!("{}", serde_json::to_string_pretty(&campaign)?);
        }

        CampaignAction::Rename { id, name } => {
            let campaign = campaigns.rename(&id, &name).await?;
            eprintln!("✏️  Renamed: {}", campaign.display_name());
        }

        CampaignAction::End { id } => {
            let campaign = campaigns.end(&id).await?;
            eprintln!("🏁 {} is now {}", campaign.display_name(), campaign.status.as_str());
        }
    }

    Ok(())
}

fn print_campaign_line(c: &Campaign) {
    println!("  📣 {} ({})", c.display_name(), c.id);
    println!("     Status: {}", c.status.as_str());
    if let Some(ref created) = c.created_at {
        println!("     Created: {}", created);
    }
    if !c.platforms.is_empty() {
        println!("     Platforms: {}", c.platforms.join(", "));
    }
    println!();
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
