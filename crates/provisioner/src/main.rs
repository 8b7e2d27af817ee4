use clap::Parser;

#[tokio::main]
async fn main() {
    let args = provisioner::arguments::Arguments::parse();
    observe::tracing::initialize("warn,provisioner=debug");
    observe::panic_hook::set_panic_hook();
    tracing::info!("running provisioner with validated arguments:\n{}", args);
    provisioner::main(args).await;
}
