pub mod channels;
pub mod cli;
pub mod display;
pub mod formats;
pub mod histogram;
pub mod model;
pub mod render;
pub mod runtime;
pub mod settings;
pub mod stains;
pub mod state;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
