use plugscout::app;

#[tokio::main]
async fn main() {
    app::startup::startup().await;
}
