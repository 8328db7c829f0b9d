#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bookrec_server::start().await
}
