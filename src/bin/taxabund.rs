//! taxabund - Taxonomic abundance ranking and comparison CLI
//!
//! Command-line interface for ranking personal microbiome test exports and
//! comparing them against a second sample or a reference study dataset.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taxabund::compare::{compare_ranked, compare_reference, ComparisonResult, StudyComparison};
use taxabund::config::AnalysisConfig;
use taxabund::data::{Rank, ReferenceTable, SampleDataset};
use taxabund::error::Result;
use taxabund::profile::profile_dataset;
use taxabund::rank::{rank_abundance, RankOptions, RankedView};

/// Taxonomic abundance ranking and comparison
#[derive(Parser)]
#[command(name = "taxabund")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank taxa of one export by relative abundance
    Rank {
        /// Path to the JSON export
        #[arg(short, long)]
        input: PathBuf,

        /// Taxonomic rank (phylum, class, order, family, genus, species)
        #[arg(short, long)]
        rank: String,

        /// Decimal precision for percentages
        #[arg(long, default_value = "2")]
        precision: u32,

        /// Keep only the top K taxa
        #[arg(long)]
        top: Option<usize>,

        /// Fail when the rank has no records
        #[arg(long)]
        strict: bool,

        /// Output format: text, tsv, or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the table to a TSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank every rank from a YAML configuration, one TSV per rank
    Run {
        /// Path to the analysis configuration YAML
        #[arg(long)]
        config: PathBuf,

        /// Path to the JSON export
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the per-rank TSV files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Compare two exports at one rank
    Compare {
        /// Path to the first JSON export (A)
        #[arg(short = 'a', long)]
        input_a: PathBuf,

        /// Path to the second JSON export (B)
        #[arg(short = 'b', long)]
        input_b: PathBuf,

        /// Taxonomic rank to compare at
        #[arg(short, long)]
        rank: String,

        /// Decimal precision for percentages
        #[arg(long, default_value = "2")]
        precision: u32,

        /// Output format: text, tsv, or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the comparison to a TSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare one export against a reference study CSV
    Study {
        /// Path to the JSON export
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the reference study CSV (columns = taxa, rows = samples)
        #[arg(short = 'R', long)]
        reference: PathBuf,

        /// Taxonomic rank of the reference columns
        #[arg(short, long, default_value = "genus")]
        rank: String,

        /// Decimal precision for percentages
        #[arg(long, default_value = "3")]
        precision: u32,

        /// Output format: text, tsv, or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Profile a JSON export
    Profile {
        /// Path to the JSON export
        #[arg(short, long)]
        input: PathBuf,

        /// Output format: text, json, or yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Generate an example analysis configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "abundance.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Rank {
            input,
            rank,
            precision,
            top,
            strict,
            format,
            output,
        } => cmd_rank(&input, &rank, precision, top, strict, &format, output.as_ref()),

        Commands::Run {
            config,
            input,
            output_dir,
        } => cmd_run(&config, &input, &output_dir),

        Commands::Compare {
            input_a,
            input_b,
            rank,
            precision,
            format,
            output,
        } => cmd_compare(&input_a, &input_b, &rank, precision, &format, output.as_ref()),

        Commands::Study {
            input,
            reference,
            rank,
            precision,
            format,
        } => cmd_study(&input, &reference, &rank, precision, &format),

        Commands::Profile { input, format } => cmd_profile(&input, &format),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load an export, reporting skipped records to stderr.
fn load_dataset(path: &PathBuf) -> Result<SampleDataset> {
    eprintln!("Loading {:?}...", path);
    let dataset = SampleDataset::from_json_file(path)?;
    eprintln!(
        "Loaded {} records (normalization constant {})",
        dataset.len(),
        dataset.normalization()
    );
    if !dataset.skipped().is_empty() {
        let mut labels: Vec<&str> = dataset
            .skipped()
            .iter()
            .map(|s| s.rank_label.as_str())
            .collect();
        labels.sort();
        labels.dedup();
        eprintln!(
            "  {} records at unsupported ranks skipped ({})",
            dataset.skipped().len(),
            labels.join(", ")
        );
    }
    Ok(dataset)
}

fn print_ranked(view: &RankedView) {
    println!("Relative abundance at {} level", view.rank);
    println!("================================");
    let prec = view.precision as usize;
    println!("{:>4}  {:<40} {:>10} {:>10}", "#", "Taxon", "Count", "%");
    for (i, t) in view.taxa.iter().enumerate() {
        println!(
            "{:>4}  {:<40} {:>10} {:>10.prec$}",
            i + 1,
            t.name,
            t.count,
            t.percentage
        );
    }
    if view.is_empty() {
        println!("  (no taxa at this rank)");
    }
}

fn cmd_rank(
    input: &PathBuf,
    rank: &str,
    precision: u32,
    top: Option<usize>,
    strict: bool,
    format: &str,
    output: Option<&PathBuf>,
) -> Result<()> {
    let dataset = load_dataset(input)?;
    let rank: Rank = rank.parse()?;
    let options = RankOptions {
        precision,
        top,
        strict,
    };

    let view = rank_abundance(&dataset, rank, &options)?;
    eprintln!("Ranked {} taxa at {} level", view.len(), rank);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&view)?),
        "tsv" => print!("{}", view.to_tsv_string()),
        _ => print_ranked(&view),
    }

    if let Some(path) = output {
        view.to_tsv(path)?;
        eprintln!("Wrote {:?}", path);
    }

    Ok(())
}

fn cmd_run(config_path: &PathBuf, input: &PathBuf, output_dir: &PathBuf) -> Result<()> {
    eprintln!("Loading configuration from {:?}...", config_path);
    let config_str = std::fs::read_to_string(config_path)?;
    let config = AnalysisConfig::from_yaml(&config_str)?;

    let dataset = load_dataset(input)?;
    let options = config.rank_options();

    eprintln!("Running analysis '{}'...", config.name);
    for &rank in &config.ranks {
        let view = rank_abundance(&dataset, rank, &options)?;
        let path = output_dir.join(format!("{}.tsv", rank));
        view.to_tsv(&path)?;
        eprintln!("  {}: {} taxa -> {:?}", rank, view.len(), path);
    }

    eprintln!("Done! {} ranks written", config.ranks.len());
    Ok(())
}

fn print_comparison(result: &ComparisonResult) {
    println!("Comparison at {} level", result.rank);
    println!("================================");
    println!();
    println!("Common taxa (difference = A - B, most depleted in A first):");
    if result.common.is_empty() {
        println!("  (none)");
    }
    for t in &result.common {
        println!(
            "  {:<40} {:>10} {:>10} {:>+12} {:>+9.2}%",
            t.name, t.count_a, t.count_b, t.difference, t.percent_difference
        );
    }
    println!();
    println!("Unique to A:");
    if result.unique_a.is_empty() {
        println!("  (none)");
    }
    for t in &result.unique_a {
        println!("  {:<40} {:>10}", t.name, t.count);
    }
    println!();
    println!("Unique to B:");
    if result.unique_b.is_empty() {
        println!("  (none)");
    }
    for t in &result.unique_b {
        println!("  {:<40} {:>10}", t.name, t.count);
    }
}

fn cmd_compare(
    input_a: &PathBuf,
    input_b: &PathBuf,
    rank: &str,
    precision: u32,
    format: &str,
    output: Option<&PathBuf>,
) -> Result<()> {
    let dataset_a = load_dataset(input_a)?;
    let dataset_b = load_dataset(input_b)?;
    let rank: Rank = rank.parse()?;
    let options = RankOptions {
        precision,
        ..Default::default()
    };

    let view_a = rank_abundance(&dataset_a, rank, &options)?;
    let view_b = rank_abundance(&dataset_b, rank, &options)?;
    let result = compare_ranked(&view_a, &view_b)?;

    eprintln!(
        "Compared {} taxa: {} common, {} unique to A, {} unique to B",
        result.n_taxa(),
        result.common.len(),
        result.unique_a.len(),
        result.unique_b.len()
    );

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "tsv" => print!("{}", result.to_tsv_string()),
        _ => print_comparison(&result),
    }

    if let Some(path) = output {
        result.to_tsv(path)?;
        eprintln!("Wrote {:?}", path);
    }

    Ok(())
}

fn print_study(result: &StudyComparison) {
    println!("Reference study comparison at {} level", result.rank);
    println!("========================================");
    println!();
    if result.matches.is_empty() {
        println!("No taxa matched the reference columns.");
    } else {
        println!(
            "{:<30} {:>9} {:>7} {:>9} {:>9} {:>9}",
            "Taxon", "Observed", "%ile", "Median", "Q1-Q3", "Range"
        );
        for m in &result.matches {
            let d = &m.distribution;
            println!(
                "{:<30} {:>8}% {:>6.0} {:>9.3} {:>4.2}-{:<4.2} {:>4.2}-{:<4.2}",
                m.name, m.observed_percent, m.percentile, d.median, d.q1, d.q3, d.min, d.max
            );
        }
    }
    if !result.unmatched_sample.is_empty() {
        println!();
        println!(
            "Sample taxa not in reference: {}",
            result.unmatched_sample.join(", ")
        );
    }
}

fn cmd_study(
    input: &PathBuf,
    reference_path: &PathBuf,
    rank: &str,
    precision: u32,
    format: &str,
) -> Result<()> {
    let dataset = load_dataset(input)?;
    let rank: Rank = rank.parse()?;

    eprintln!("Loading reference table {:?}...", reference_path);
    let reference = ReferenceTable::from_csv(reference_path)?;
    eprintln!(
        "Loaded {} taxa x {} study samples",
        reference.n_taxa(),
        reference.n_samples()
    );

    let options = RankOptions {
        precision,
        ..Default::default()
    };
    let view = rank_abundance(&dataset, rank, &options)?;
    let result = compare_reference(&view, &reference);

    eprintln!(
        "Matched {} of {} taxa against the reference",
        result.len(),
        view.len()
    );

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "tsv" => print!("{}", result.to_tsv_string()),
        _ => print_study(&result),
    }

    Ok(())
}

fn cmd_profile(input: &PathBuf, format: &str) -> Result<()> {
    let dataset = load_dataset(input)?;
    let profile = profile_dataset(&dataset);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&profile)?),
        "yaml" => println!("{}", serde_yaml::to_string(&profile)?),
        _ => print!("{}", profile),
    }

    Ok(())
}

fn cmd_example(output: &PathBuf) -> Result<()> {
    let config = AnalysisConfig::default();
    let yaml = config.to_yaml()?;

    std::fs::write(output, &yaml)?;
    eprintln!("Wrote example configuration to {:?}", output);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}
