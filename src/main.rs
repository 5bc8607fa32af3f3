use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match script_runner::cli::run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::debug!(error = %format!("{:#}", e), "script-runner failed");
            script_runner::ui::error_box(&format!("{:#}", e));
            process::exit(1);
        }
    }
}
