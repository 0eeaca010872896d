//! Crawl statistics
//!
//! This module combines the engine's counters with the shape of the final
//! table and prints them after a run.

use crate::crawler::CrawlStats;
use crate::output::ResultTable;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Result pages fetched successfully
    pub pages_fetched: usize,

    /// Result pages that failed
    pub pages_failed: usize,

    /// Search listings fetched (zero for site crawls)
    pub listings_fetched: usize,

    /// Search listings that failed
    pub listings_failed: usize,

    /// Extraction records kept
    pub records: usize,

    /// Rows after aggregation
    pub rows: usize,

    /// Columns after aggregation
    pub columns: usize,

    /// Wall time of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Builds statistics from engine counters and the aggregated table
    pub fn new(stats: &CrawlStats, table: &ResultTable) -> Self {
        Self {
            pages_fetched: stats.pages_fetched,
            pages_failed: stats.pages_failed,
            listings_fetched: stats.listings_fetched,
            listings_failed: stats.listings_failed,
            records: stats.records,
            rows: table.len(),
            columns: table.columns().len(),
            elapsed: stats.elapsed,
        }
    }

    /// Share of attempted pages that were fetched, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Fetched: {}", stats.pages_fetched);
    println!("  Failed: {}", stats.pages_failed);
    if stats.listings_fetched + stats.listings_failed > 0 {
        println!(
            "  Result listings: {} fetched, {} failed",
            stats.listings_fetched, stats.listings_failed
        );
    }
    println!();

    println!("Results:");
    println!("  Records: {}", stats.records);
    println!("  Rows: {} ({} columns)", stats.rows, stats.columns);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched) in {:.1}s",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_fetched + stats.pages_failed,
        stats.elapsed.as_secs_f64()
    );
}
