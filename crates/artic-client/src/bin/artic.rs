//! Fetch and print one page of the Art Institute artworks collection.
//!
//! ```text
//! artic --page 2 --limit 10 --select "27992, 20684"
//! ```

use clap::Parser;
use comfy_table::Table;

use artic_client::ArticClient;
use galleria_core::{IdScheme, PaginationController, SelectionSet};

#[derive(Parser)]
#[command(
    name = "artic",
    about = "Browse the Art Institute of Chicago artworks collection"
)]
struct Cli {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Rows per page
    #[arg(long, default_value_t = 10)]
    limit: u32,

    /// Comma-separated artwork ids to mark as selected
    #[arg(long)]
    select: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let controller =
        PaginationController::new(ArticClient::new(), IdScheme::ServerId, SelectionSet::new());

    if let Some(spec) = cli.select.as_deref() {
        controller.apply_bulk_spec(spec);
    }

    controller.change_page(cli.page, cli.limit).await?;
    let page = controller.current_page().ok_or("no page loaded")?;

    let mut table = Table::new();
    table.set_header(["", "ID", "Title", "Origin", "Artist", "Start", "End"]);
    for row in controller.rows() {
        table.add_row([
            if row.checked { "x" } else { "" }.to_string(),
            row.id.to_string(),
            row.artwork.title.clone(),
            row.artwork.place_of_origin.clone().unwrap_or_default(),
            row.artwork.artist_display.clone().unwrap_or_default(),
            row.artwork
                .date_start
                .map(|d| d.to_string())
                .unwrap_or_default(),
            row.artwork
                .date_end
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ]);
    }
    println!("{table}");
    println!(
        "page {} ({} rows) of {} records; {} selected",
        page.page_number,
        page.artworks.len(),
        page.total_records,
        controller.selected_ids().len()
    );

    Ok(())
}
