use anyhow::Result;
use clap::Parser;
use custledger::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    custledger::logging::init(cli.verbose);
    cli.run()
}
