use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    decksmith_cli::run().await
}
