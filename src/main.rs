use anyhow::Result;
use clap::Parser;

use datagrid::cli::{self, CliArgs, Command, RenderOptions};

fn main() -> Result<()> {
    datagrid::tracing::init();

    let args = CliArgs::parse();
    let config = args.load_config()?;

    match args.command {
        Command::Render {
            rows,
            columns,
            mode,
            row_key,
            details,
            expand,
        } => {
            let options = RenderOptions {
                columns,
                mode,
                row_key,
                details,
                expand,
            };
            println!("{}", cli::render(&config, &rows, &options)?);
        }
        Command::ParseNumber { inputs } => {
            print!("{}", cli::parse_numbers(&inputs));
        }
    }

    Ok(())
}
