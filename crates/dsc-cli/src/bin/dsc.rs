use anyhow::Result;
use clap::Parser;
use dsc_cli::args::CliArgs;
use dsc_cli::driver;
use dsc_cli::tracing_config::init_tracing;

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let output = driver::run(&args)?;
    print!("{output}");
    Ok(())
}
