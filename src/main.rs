use clap::Parser;

use configform::ConfigFormError;
use configform::cli::Cli;
use configform::config::{get_config, init_config};
use configform::interfaces::cli::run_cli;
use configform::system::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());

    let _guard = match init_logging(&get_config().logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    if let Err(e) = run_cli(cli.command).await {
        match e.downcast_ref::<ConfigFormError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}
