use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    chunkflow_cli::main_entry().await
}
