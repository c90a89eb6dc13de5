//! `tn` entry point: parse arguments, sweep the document, run every variant.

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tn_cli::run().map_err(color_eyre::eyre::Report::from)
}
