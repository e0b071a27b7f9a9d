use clap::Parser;
use std::sync::Arc;

use group_kickoff::config::{Cli, Command, ReportArgs};
use group_kickoff::display::print_alignment_report;
use group_kickoff::service::GroupService;
use group_kickoff::store::{JsonStore, Store};
use group_kickoff::{alignment, web, Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => {
            let config = args.server_config();
            let store = JsonStore::open(&args.data)?;
            let service = GroupService::new(Arc::new(store), config.secret.clone());

            println!("Access the API at http://localhost:{}/api", config.port);
            web::start_server(config, service).await?;
        }
        Command::Report(args) => report(&args)?,
    }

    Ok(())
}

fn report(args: &ReportArgs) -> Result<(), Error> {
    let store = JsonStore::open(&args.data)?;
    let group = store
        .group_by_code(args.code.trim())?
        .ok_or_else(|| Error::NotFound(format!("Group with code {}", args.code)))?;

    let report = alignment::analyze(store.roster(&group.id)?);
    print_alignment_report(&group, &report);
    Ok(())
}
