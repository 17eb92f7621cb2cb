#[tokio::main]
async fn main() -> std::io::Result<()> {
    admin_gate::run_with_config().await
}
