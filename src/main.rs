use onetap_api::frameworks::server;

#[tokio::main]
async fn main() {
    // Delegate to the server framework entry point.
    server::run().await;
}
