#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Startup failures are already logged; returning them sets a non-zero exit code.
    lobby_relay::run_with_config().await
}
