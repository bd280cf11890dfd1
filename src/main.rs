/// Entry point for the Docker Stats Exporter.
///
/// Serves the resource usage of all running containers on `GET /metrics`,
/// reading it from the container runtime daemon on every scrape.
///
/// # Errors
///
/// Returns an error if the metrics endpoint cannot be served.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug DOCKER_SOCKET_PATH=/var/run/docker.sock cargo run
/// curl localhost:9100/metrics
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    docker_stats_exporter::run().await
}
