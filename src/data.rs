//! Borrow-event loading and transaction normalization using Polars

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use polars::prelude::*;

use crate::itemset::Itemset;

/// Raw borrowing event as read from the input CSV.
#[derive(Debug, Clone)]
pub struct BorrowRecord {
    /// Borrower identifier, used for per-user grouping during evaluation
    pub user_id: i64,
    /// Genre labels of the borrowed titles (may contain duplicates and
    /// labels outside the vocabulary)
    pub genres: Vec<String>,
    /// Event time, unused by the mining core
    pub timestamp: Option<DateTime<Utc>>,
}

/// Default genre vocabulary for library borrowing data.
pub fn default_genre_vocabulary() -> HashSet<String> {
    [
        "Fiction",
        "Mystery",
        "Thriller",
        "Romance",
        "Drama",
        "Science Fiction",
        "Fantasy",
        "Historical Fiction",
        "Biography",
        "Self-Help",
        "Business",
        "Crime",
        "Adventure",
        "Horror",
        "Poetry",
        "Classic",
        "Young Adult",
        "Contemporary",
        "Dystopian",
    ]
    .iter()
    .map(|genre| (*genre).to_string())
    .collect()
}

/// Load borrowing events from a CSV file.
///
/// Expected columns: `user_id` (integer), `genres` (semicolon-separated
/// labels) and optionally `timestamp` (RFC 3339). Rows missing a required
/// field are an error, not a filter: silent dropping only happens later in
/// [`normalize_transactions`] for vocabulary misses.
pub fn load_borrow_events(file_path: &str) -> crate::Result<Vec<BorrowRecord>> {
    let df = CsvReader::from_path(file_path)?.has_header(true).finish()?;

    let user_col = df.column("user_id")?.cast(&DataType::Int64)?;
    let user_ids = user_col.i64()?;
    let genre_col = df.column("genres")?.utf8()?;
    let ts_col = df.column("timestamp").ok().map(|s| s.utf8()).transpose()?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let user_id = user_ids
            .get(idx)
            .ok_or_else(|| anyhow::anyhow!("row {}: missing user_id", idx))?;

        let raw_genres = genre_col
            .get(idx)
            .ok_or_else(|| anyhow::anyhow!("row {}: missing genres", idx))?;
        let genres: Vec<String> = raw_genres
            .split(';')
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty())
            .collect();
        if genres.is_empty() {
            anyhow::bail!("row {}: missing genres", idx);
        }

        let timestamp = match ts_col {
            Some(col) => match col.get(idx) {
                Some(raw) => Some(
                    DateTime::parse_from_rfc3339(raw)
                        .map_err(|e| {
                            anyhow::anyhow!("row {}: invalid timestamp '{}': {}", idx, raw, e)
                        })?
                        .with_timezone(&Utc),
                ),
                None => None,
            },
            None => None,
        };

        records.push(BorrowRecord {
            user_id,
            genres,
            timestamp,
        });
    }

    Ok(records)
}

/// Reduce raw records to deduplicated genre sets restricted to `allowed`.
///
/// Each record's genre list is deduplicated and intersected with the
/// vocabulary; records whose intersection is empty are dropped without error.
/// Output order follows input order.
pub fn normalize_transactions(
    records: &[BorrowRecord],
    allowed: &HashSet<String>,
) -> Vec<Itemset> {
    records
        .iter()
        .filter_map(|record| {
            let itemset = Itemset::new(
                record
                    .genres
                    .iter()
                    .filter(|genre| allowed.contains(*genre))
                    .cloned(),
            );
            if itemset.is_empty() {
                None
            } else {
                Some(itemset)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "user_id,genres,timestamp").unwrap();
        writeln!(file, "1,Mystery;Thriller,2024-01-01T10:00:00Z").unwrap();
        writeln!(file, "2,Romance;Drama,2024-01-02T10:00:00Z").unwrap();
        writeln!(file, "1,Thriller;Crime,2024-01-06T10:00:00Z").unwrap();
        file
    }

    #[test]
    fn test_load_borrow_events() {
        let test_file = create_test_csv();
        let records = load_borrow_events(test_file.path().to_str().unwrap()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].user_id, 1);
        assert_eq!(records[0].genres, vec!["Mystery", "Thriller"]);
        assert!(records[0].timestamp.is_some());
        assert_eq!(records[1].user_id, 2);
    }

    #[test]
    fn test_load_without_timestamp_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "user_id,genres").unwrap();
        writeln!(file, "7,Fantasy;Science Fiction").unwrap();

        let records = load_borrow_events(file.path().to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].genres, vec!["Fantasy", "Science Fiction"]);
        assert!(records[0].timestamp.is_none());
    }

    #[test]
    fn test_load_rejects_bad_timestamp() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "user_id,genres,timestamp").unwrap();
        writeln!(file, "1,Mystery,not-a-date").unwrap();

        let result = load_borrow_events(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_missing_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "borrower,labels").unwrap();
        writeln!(file, "1,Mystery").unwrap();

        let result = load_borrow_events(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_filters_and_deduplicates() {
        let records = vec![
            BorrowRecord {
                user_id: 1,
                genres: vec![
                    "Mystery".to_string(),
                    "Mystery".to_string(),
                    "Thriller".to_string(),
                    "Cooking".to_string(), // not in vocabulary
                ],
                timestamp: None,
            },
            BorrowRecord {
                user_id: 2,
                genres: vec!["Cooking".to_string(), "Gardening".to_string()],
                timestamp: None,
            },
        ];

        let transactions = normalize_transactions(&records, &default_genre_vocabulary());

        // The second record has no vocabulary genres and is dropped
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0], Itemset::new(["Mystery", "Thriller"]));
    }

    #[test]
    fn test_normalize_preserves_input_order() {
        let records: Vec<BorrowRecord> = ["Romance", "Mystery", "Drama"]
            .iter()
            .enumerate()
            .map(|(i, genre)| BorrowRecord {
                user_id: i as i64,
                genres: vec![(*genre).to_string()],
                timestamp: None,
            })
            .collect();

        let transactions = normalize_transactions(&records, &default_genre_vocabulary());
        assert_eq!(transactions[0], Itemset::new(["Romance"]));
        assert_eq!(transactions[1], Itemset::new(["Mystery"]));
        assert_eq!(transactions[2], Itemset::new(["Drama"]));
    }

    #[test]
    fn test_default_vocabulary() {
        let vocab = default_genre_vocabulary();
        assert_eq!(vocab.len(), 19);
        assert!(vocab.contains("Mystery"));
        assert!(vocab.contains("Science Fiction"));
        assert!(!vocab.contains("Cooking"));
    }
}
