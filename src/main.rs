//! scrapeboard CLI
//!
//! ```bash
//! scrapeboard render --output dashboard.html
//! scrapeboard logs --json
//! scrapeboard serve --port 3030
//! ```

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    cli::run().await
}
