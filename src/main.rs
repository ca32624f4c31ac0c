//! GenreMiner: Apriori-based genre recommendation CLI for library borrowing data
//!
//! This is the main entrypoint that orchestrates data loading, itemset
//! mining, rule generation, evaluation, rule export, and visualization.

use std::collections::HashSet;
use std::fs::File;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use genreminer::{
    default_genre_vocabulary, evaluate, generate_rules, load_borrow_events,
    mine_frequent_itemsets, normalize_transactions, recommend, to_records, viz, Args,
    AssociationRule, Itemset, RuleRecord,
};
use serde::Serialize;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("GenreMiner - Genre Recommendations via Apriori Rule Mining");
        println!("==========================================================\n");
    }

    let vocabulary = match args.parse_vocabulary()? {
        Some(vocab) => vocab,
        None => default_genre_vocabulary(),
    };

    // Check if in recommendation mode
    if let Some(profile_genres) = args.parse_profile()? {
        run_recommend_mode(&args, &vocabulary, profile_genres)?;
    } else {
        run_full_pipeline(&args, &vocabulary)?;
    }

    Ok(())
}

/// Run recommendation mode for a single user profile
fn run_recommend_mode(
    args: &Args,
    vocabulary: &HashSet<String>,
    profile_genres: Vec<String>,
) -> Result<()> {
    println!("=== Recommendation Mode ===");
    println!("Profile genres: {}", profile_genres.join(", "));

    let start_time = Instant::now();

    if args.verbose {
        println!("\nLoading borrowing history from: {}", args.input);
    }
    let records = load_borrow_events(&args.input)?;
    let transactions = normalize_transactions(&records, vocabulary);

    if args.verbose {
        println!(
            "Loaded {} records, {} valid transactions",
            records.len(),
            transactions.len()
        );
        println!("\nMining frequent itemsets with minsup={}...", args.minsup);
    }

    let frequent = mine_frequent_itemsets(&transactions, args.minsup)?;
    let rules = generate_rules(&frequent, args.minconf, args.minlift)?;

    if args.verbose {
        println!(
            "Found {} frequent itemsets, {} rules",
            frequent.len(),
            rules.len()
        );
    }

    let profile = Itemset::new(profile_genres);
    let recommendations = recommend(&profile, &rules, args.top_k)?;
    let elapsed = start_time.elapsed();

    if recommendations.is_empty() {
        println!("\nNo recommendations for this profile.");
    } else {
        println!("\nTop {} recommendations:", recommendations.len());
        for rec in &recommendations {
            println!("  {} (score {:.3})", rec.genre, rec.score);
            for reason in &rec.reasons {
                println!("    - {}", reason);
            }
        }
    }
    println!("\nProcessing time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Run the full mining pipeline
fn run_full_pipeline(args: &Args, vocabulary: &HashSet<String>) -> Result<()> {
    println!("=== Full Mining Pipeline ===\n");

    let start_time = Instant::now();

    // Step 1: Load and normalize transactions
    if args.verbose {
        println!("Step 1: Loading and normalizing transactions");
        println!("  Input file: {}", args.input);
    }

    let data_start = Instant::now();
    let records = load_borrow_events(&args.input)?;
    let transactions = normalize_transactions(&records, vocabulary);
    let data_time = data_start.elapsed();

    println!(
        "✓ Data loaded: {} records, {} valid transactions",
        records.len(),
        transactions.len()
    );
    if args.verbose {
        println!("  Processing time: {:.2}s", data_time.as_secs_f64());
    }

    // Step 2: Mine frequent itemsets
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets");
        println!("  Minimum support: {}", args.minsup);
    }

    let mine_start = Instant::now();
    let frequent = mine_frequent_itemsets(&transactions, args.minsup)?;
    let mine_time = mine_start.elapsed();

    println!("✓ Frequent itemsets mined: {}", frequent.len());
    if args.verbose {
        for k in 1..=frequent.max_size() {
            println!("  {}-itemsets: {}", k, frequent.of_size(k).len());
        }
        println!("  Mining time: {:.2}s", mine_time.as_secs_f64());
    }

    // Step 3: Generate association rules
    if args.verbose {
        println!("\nStep 3: Generating association rules");
        println!(
            "  Minimum confidence: {}, minimum lift: {}",
            args.minconf, args.minlift
        );
    }

    let rules = generate_rules(&frequent, args.minconf, args.minlift)?;
    println!("✓ Rules generated: {}", rules.len());

    // Step 4: Evaluate against held-out transactions
    if args.verbose {
        println!("\nStep 4: Evaluating recommendations (top_k={})", args.top_k);
    }

    let report = evaluate(&records, &rules, args.top_k)?;
    println!(
        "✓ Evaluation complete: {} users evaluated",
        report.users_evaluated
    );

    // Step 5: Export rules
    export_rules(args, &rules)?;

    // Step 6: Generate visualization report
    if args.verbose {
        println!("\nStep 6: Generating visualizations");
        println!("  Output file: {}", args.output);
    }
    viz::generate_visualization_report(&frequent, &rules, &report, &args.output)?;

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());
    println!("Rules saved to: {}", args.rules_out);
    println!("Charts saved to: {}", args.output);

    Ok(())
}

/// JSON document written next to the charts; mirrors the exported rule shape
#[derive(Serialize)]
struct RuleExport<'a> {
    parameters: ExportParameters,
    generated_at: String,
    rules: &'a [RuleRecord],
}

#[derive(Serialize)]
struct ExportParameters {
    minsup: f64,
    minconf: f64,
    minlift: f64,
    top_k: usize,
}

fn export_rules(args: &Args, rules: &[AssociationRule]) -> Result<()> {
    let records = to_records(rules);
    let export = RuleExport {
        parameters: ExportParameters {
            minsup: args.minsup,
            minconf: args.minconf,
            minlift: args.minlift,
            top_k: args.top_k,
        },
        generated_at: chrono::Utc::now().to_rfc3339(),
        rules: &records,
    };

    let file = File::create(&args.rules_out)?;
    serde_json::to_writer_pretty(file, &export)?;
    println!("✓ Rules exported: {} -> {}", records.len(), args.rules_out);

    Ok(())
}
