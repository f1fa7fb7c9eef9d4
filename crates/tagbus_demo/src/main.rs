#[tokio::main]
async fn main() {
    if let Err(e) = lib_tagbus_demo::init().await {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
