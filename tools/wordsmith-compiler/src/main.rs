use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use wordsmith_catalog::{default_catalog, parse_json, to_archive, validate, Catalog};
use wordsmith_generator::{compose_hint, GeneratorConfig, QuestionGenerator};
use wordsmith_protocol::{root_candidates, Difficulty};

#[derive(Parser)]
#[command(author, version, about = "Builds and inspects Wordsmith morpheme catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON catalog and write it as an rkyv archive
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// List every integrity problem in a JSON catalog
    Validate {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Print generated questions and hints
    Preview {
        /// JSON catalog or compiled archive; the embedded catalog when omitted
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        #[arg(short, long, default_value_t = 3)]
        count: usize,

        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Minimum tiles per bank
        #[arg(long)]
        bank_size: Option<usize>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { input, output } => compile(&input, &output),
        Commands::Validate { input } => validate_file(&input),
        Commands::Preview {
            input,
            difficulty,
            count,
            seed,
            bank_size,
        } => preview(input.as_deref(), difficulty, count, seed, bank_size),
    }
}

fn compile(input: &Path, output: &Path) -> anyhow::Result<()> {
    info!("Reading JSON catalog from {:?}", input);
    let json = fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let file = parse_json(&json)?;

    // Refuse to ship a catalog the generator would trip over.
    let catalog = Catalog::validated(file.clone()).context("Catalog failed validation")?;
    info!(
        "Compiling catalog version {} with {} morphemes and {}/{}/{} words",
        catalog.version(),
        catalog.morphemes().len(),
        catalog.tier(Difficulty::Easy).len(),
        catalog.tier(Difficulty::Medium).len(),
        catalog.tier(Difficulty::Hard).len(),
    );

    let bytes = to_archive(&file)?;
    fs::write(output, &bytes).with_context(|| format!("Failed to write {:?}", output))?;

    info!("Archive written to {:?} ({} bytes)", output, bytes.len());
    Ok(())
}

fn validate_file(input: &Path) -> anyhow::Result<()> {
    let json = fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let file = parse_json(&json)?;
    let issues = validate::issues(&file);
    if issues.is_empty() {
        println!("{:?}: OK ({} morphemes)", input, file.morphemes.len());
        return Ok(());
    }
    for issue in &issues {
        println!("{:?}: {}", input, issue);
    }
    bail!("{} issue(s) found", issues.len())
}

fn load_catalog(input: Option<&Path>) -> anyhow::Result<Catalog> {
    let Some(path) = input else {
        return Ok(default_catalog()?);
    };
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let catalog = if path.extension().is_some_and(|ext| ext == "json") {
        Catalog::from_json(std::str::from_utf8(&bytes).context("Catalog is not UTF-8")?)?
    } else {
        Catalog::from_archive(&bytes)?
    };
    Ok(catalog)
}

fn preview(
    input: Option<&Path>,
    difficulty: Difficulty,
    count: usize,
    seed: Option<u64>,
    bank_size: Option<usize>,
) -> anyhow::Result<()> {
    let catalog = load_catalog(input)?;
    let mut config = GeneratorConfig::default();
    if let Some(size) = bank_size {
        config.bank_size = size;
    }
    let generator = QuestionGenerator::with_config(&catalog, config);

    let seed = seed.unwrap_or_else(rand::random);
    info!("Previewing {} {} question(s) with seed {}", count, difficulty, seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut previous: Option<String> = None;
    for _ in 0..count {
        let question = generator.generate(&mut rng, difficulty, previous.as_deref())?;
        let hint = compose_hint(catalog.index(), &root_candidates(&question.parts));
        println!("{}", serde_json::to_string_pretty(&question)?);
        println!("hint: {}\n", hint);
        previous = Some(question.answer);
    }
    Ok(())
}
