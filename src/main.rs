use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use mortydex::{
    AppError, SessionStore,
    catalog::GraphQlClient,
    cli::{Cli, Commands},
    commands::App,
    config::Config,
    logging::init_logging,
    menu::run_menu,
    pagination::parse_page_param,
    storage::{FileStore, KeyValueStore, MemoryStore},
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_cli(&cli)?;

    let storage: Box<dyn KeyValueStore> = if config.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(&config.data_dir))
    };
    let source = GraphQlClient::new(config.endpoint.clone(), config.timeout)?;
    let mut app = App::new(SessionStore::open(storage), source);

    match cli.command {
        Some(Commands::Login { username, job_title }) => {
            println!("{}", app.login_user(&username, &job_title)?)
        }
        Some(Commands::Update { username, job_title }) => {
            println!("{}", app.update_user(&username, &job_title)?)
        }
        Some(Commands::Logout) => println!("{}", app.logout_user()),
        Some(Commands::Whoami) => println!("{}", app.current_user()?),
        Some(Commands::List { page }) => {
            println!("{}", app.list_characters(parse_page_param(page.as_deref()))?)
        }
        Some(Commands::Show { id, page }) => {
            println!("{}", app.show_character(&id, parse_page_param(page.as_deref()))?)
        }
        Some(Commands::Open { target }) => println!("{}", app.open(&target)?),
        None => run_menu(&mut app)?,
    }

    Ok(())
}
