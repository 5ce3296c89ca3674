//! Thin binary wrapper: set up logging, then hand over to the library.
//!
//! Run:
//! - `cargo run --release`
//! - `RUST_LOG=debug cargo run` for per-frame surface diagnostics

fn main() -> anyhow::Result<()> {
    // Keep logging setup in the binary so the library remains unopinionated.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    magnus::run_app()
}
