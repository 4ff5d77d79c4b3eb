//! The `prism search` command for product catalog lookups.

use anyhow::Context;
use clap::Args;
use prism_core::{Config, ProductItem, ProductSearchClient};

/// Arguments for the `search` command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keywords (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub keywords: Vec<String>,

    /// Number of items to request (default: product_search.item_count)
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Print the items as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    fn query(&self) -> String {
        self.keywords.join(" ")
    }
}

/// Execute the search command.
pub async fn execute(args: SearchArgs, config: Config) -> anyhow::Result<()> {
    let keywords = args.query();
    let count = args.count.unwrap_or(config.product_search.item_count);
    if count == 0 {
        anyhow::bail!("--count must be > 0");
    }

    let client = ProductSearchClient::from_config(&config.product_search)?;
    let items = client
        .search_items(&keywords, count)
        .await
        .with_context(|| format!("Product search for {keywords:?} failed"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No results for {keywords:?}");
        return Ok(());
    }
    for item in &items {
        print!("{}", format_item(item));
    }
    Ok(())
}

/// Text block for one item.
fn format_item(item: &ProductItem) -> String {
    let mut out = format!("ASIN: {}\n", item.asin);
    if let Some(url) = &item.detail_page_url {
        out.push_str(&format!("DetailPageURL: {url}\n"));
    }
    if let Some(title) = &item.title {
        out.push_str(&format!("Title: {title}\n"));
    }
    if let Some(price) = &item.price {
        out.push_str(&format!("Buying Price: {price}\n"));
    }
    out
}
