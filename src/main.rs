#[tokio::main]
async fn main() {
    if let Err(e) = catalogue::start_server().await {
        tracing::error!("Catalogue service failed: {}", e);
        eprintln!("catalogue: {}", e);
        std::process::exit(1);
    }
}
