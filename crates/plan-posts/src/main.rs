use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dialoguer::Password;
use shared::{
    default_output_path, parse_topics, save_plan, Config, ContentExtractor, DataForSeoClient,
    EditorialPlanner, ExportFormat, OpenAiClient, PlanExporter, PlanRequest, Session,
    SerpClient, SourceMode, TtlCache, DEFAULT_TTL,
};
use std::fs;
use std::io::{self as stdio, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// Search only the business website (site: query)
    Site,
    /// Generic web query on the topic
    Web,
}

impl From<Source> for SourceMode {
    fn from(source: Source) -> Self {
        match source {
            Source::Site => SourceMode::Site,
            Source::Web => SourceMode::Web,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Xlsx,
    Csv,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => ExportFormat::Xlsx,
            Format::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Parser)]
#[command(name = "plan-posts")]
#[command(about = "Build a Local SEO editorial plan of Google Business Profile posts")]
struct Args {
    /// Business name
    #[arg(short, long)]
    business: Option<String>,

    /// Business sector
    #[arg(short, long)]
    sector: Option<String>,

    /// Business website (e.g. https://www.sito.it)
    #[arg(short, long)]
    website: Option<String>,

    /// Topic to write about (repeat for several topics)
    #[arg(short, long = "topic")]
    topics: Vec<String>,

    /// File with one topic per line
    #[arg(long)]
    topics_file: Option<PathBuf>,

    /// Number of posts per topic
    #[arg(short = 'n', long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=20))]
    posts: u8,

    /// Extra instructions for the copywriter
    #[arg(long, default_value = "")]
    brief: String,

    /// Where source material comes from
    #[arg(long, value_enum, default_value = "site")]
    source: Source,

    /// Output file (defaults to piano_editoriale_local_seo.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spreadsheet format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: Format,
}

fn read_line() -> Result<Option<String>> {
    let mut input = String::new();
    let bytes = stdio::stdin().read_line(&mut input)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    stdio::stdout().flush()?;
    read_line()?.ok_or_else(|| anyhow::anyhow!("Input closed while waiting for {}", label))
}

/// Masked prompt; the password is never echoed to the terminal.
fn prompt_password(session: &mut Session, secret: &str) -> Result<()> {
    println!("🔒 Accesso protetto");
    unlock_session(session, secret, || {
        Ok(Password::new()
            .with_prompt("Inserisci la password")
            .interact()?)
    })
}

/// Keep asking until an attempt matches.
fn unlock_session<F>(session: &mut Session, secret: &str, mut next_attempt: F) -> Result<()>
where
    F: FnMut() -> Result<String>,
{
    while !session.is_authenticated() {
        let attempt = next_attempt()?;
        if let Err(e) = session.authenticate(&attempt, secret) {
            println!("✗ {}", e);
        }
    }
    Ok(())
}

fn prompt_topics() -> Result<String> {
    println!("Inserisci argomento/i (uno per riga, riga vuota per terminare):");
    let mut lines = Vec::new();
    while let Some(line) = read_line()? {
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

fn gather_topics(args: &Args) -> Result<Vec<String>> {
    let mut raw = args.topics.join("\n");

    if let Some(path) = &args.topics_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read topics file: {}", path.display()))?;
        raw.push('\n');
        raw.push_str(&content);
    }

    if parse_topics(&raw).is_empty() {
        raw = prompt_topics()?;
    }

    Ok(parse_topics(&raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(stdio::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    config.log_redacted();

    let mut session = Session::new();
    prompt_password(&mut session, &config.app_password)?;

    let business = match &args.business {
        Some(b) => b.clone(),
        None => prompt("Nome azienda")?,
    };
    let sector = match &args.sector {
        Some(s) => s.clone(),
        None => prompt("Settore")?,
    };
    let source_mode = SourceMode::from(args.source);
    let website = match (&args.website, source_mode) {
        (Some(w), _) => w.clone(),
        (None, SourceMode::Site) => prompt("Sito web (es: https://www.sito.it)")?,
        (None, SourceMode::Web) => String::new(),
    };

    let topics = gather_topics(&args)?;
    if topics.is_empty() {
        anyhow::bail!("Inserisci almeno un argomento");
    }
    println!("\n✓ {} argomenti da elaborare", topics.len());

    let request = PlanRequest {
        business,
        sector,
        website,
        topics,
        posts_per_topic: args.posts,
        brief: args.brief.clone(),
        source_mode,
    };

    let dataforseo = DataForSeoClient::new(&config.dataforseo_login, &config.dataforseo_password)
        .context("Failed to create DataForSEO client")?;
    let serp = SerpClient::new(dataforseo.clone(), Arc::new(TtlCache::new(DEFAULT_TTL)));
    let extractor = ContentExtractor::new(dataforseo, Arc::new(TtlCache::new(DEFAULT_TTL)));
    let model = OpenAiClient::new(config.openai_api_key.clone(), config.openai_model.clone())?;

    let planner = EditorialPlanner::new(Arc::new(serp), Arc::new(extractor), Arc::new(model));

    println!("\n🔎 Ricerca fonti, sintesi e generazione post...");
    println!("  (Potrebbe richiedere qualche minuto...)");
    let plan = planner
        .run(&session, &request)
        .await
        .context("Failed to generate editorial plan")?;

    println!("\n✅ Piano editoriale generato! ({} post)\n", plan.len());
    print!("{}", PlanExporter::render_table(&plan));

    let format = ExportFormat::from(args.format);
    let output = args.output.unwrap_or_else(|| default_output_path(format));
    let filepath = save_plan(&plan, &output, format).context("Failed to save editorial plan")?;

    println!("\n⬇️  Piano salvato in: {}", filepath.display());

    Ok(())
}
