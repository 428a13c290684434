use clap::Parser;
use mazepath::{
    app::{self, App, Cli},
    logging,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli.log_file)?;
    tracing::info!("Starting with {:?}", cli);

    let app = App::from_cli(&cli);
    let reports = app.run()?;

    for report in &reports {
        println!("{}", app::summary(report));
    }
    Ok(())
}
