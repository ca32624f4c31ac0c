//! Command-line interface definitions and argument parsing

use std::collections::HashSet;

use clap::Parser;

/// Genre recommendation CLI using Apriori association-rule mining on library
/// borrowing data
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file of borrowing events
    #[arg(short, long, default_value = "borrow_events.csv")]
    pub input: String,

    /// Minimum support threshold for frequent itemsets
    #[arg(long, default_value = "0.2")]
    pub minsup: f64,

    /// Minimum confidence threshold for association rules
    #[arg(long, default_value = "0.6")]
    pub minconf: f64,

    /// Minimum lift threshold for association rules
    #[arg(long, default_value = "1.2")]
    pub minlift: f64,

    /// Number of recommendations to return
    #[arg(short = 'k', long, default_value = "5")]
    pub top_k: usize,

    /// Recommendation mode: provide a comma-separated genre profile
    /// Example: --recommend "Mystery,Thriller"
    #[arg(short, long)]
    pub recommend: Option<String>,

    /// Output path for the exported rules JSON
    #[arg(long, default_value = "genre_association_rules.json")]
    pub rules_out: String,

    /// Output path for the rule chart PNG
    #[arg(short, long, default_value = "rule_chart.png")]
    pub output: String,

    /// Comma-separated genre vocabulary overriding the built-in set
    #[arg(long)]
    pub vocabulary: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the genre profile from the recommend string.
    pub fn parse_profile(&self) -> crate::Result<Option<Vec<String>>> {
        match self.recommend {
            Some(ref profile_str) => {
                let genres = split_genres(profile_str);
                if genres.is_empty() {
                    anyhow::bail!(
                        "Profile must contain at least one genre, e.g. \"Mystery,Thriller\""
                    );
                }
                Ok(Some(genres))
            }
            None => Ok(None),
        }
    }

    /// Parse the vocabulary override, if one was supplied.
    pub fn parse_vocabulary(&self) -> crate::Result<Option<HashSet<String>>> {
        match self.vocabulary {
            Some(ref vocab_str) => {
                let genres = split_genres(vocab_str);
                if genres.is_empty() {
                    anyhow::bail!("Vocabulary override must contain at least one genre");
                }
                Ok(Some(genres.into_iter().collect()))
            }
            None => Ok(None),
        }
    }
}

fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .collect()
}
