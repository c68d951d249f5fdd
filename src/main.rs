//! Vacancies CLI - collect hh.ru job vacancies, filter them and export
//!
//! Runs one subcommand, or the interactive menu when none is given.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use vacancies::cli::{Cli, Command};
use vacancies::config::Config;
use vacancies::manager::VacancyManager;
use vacancies::menu::{self, Menu};
use vacancies::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir.clone());

    if let Err(e) = logging::init(&config.log_file, cli.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!("Using data directory {}", config.data_dir.display());

    let mut manager = match VacancyManager::new(config) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command(), &mut manager).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Command,
    manager: &mut VacancyManager,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();

    match command {
        Command::Search { query, count } => {
            let count = count.unwrap_or(manager.config().default_count);
            let added = manager.search_and_add(&query, count).await?;
            println!("Added {} new vacancies ({} stored)", added, manager.len());
        }
        Command::Add(args) => {
            let vacancy = manager.add_manual(args.into())?;
            println!("Vacancy added with id {}", vacancy.id);
        }
        Command::List => {
            let vacancies = manager.get_vacancies(&Default::default());
            menu::print_vacancies(&mut stdout, &vacancies)?;
        }
        Command::Filter(args) => {
            let vacancies = manager.get_vacancies(&args.into());
            menu::print_vacancies(&mut stdout, &vacancies)?;
        }
        Command::Delete { id } => {
            if manager.delete(&id)? {
                println!("Vacancy {} deleted", id);
            } else {
                println!("Vacancy {} not found", id);
            }
        }
        Command::Export { format, output } => {
            let path = manager.export(format, output.as_deref())?;
            println!("Exported to: {}", path.display());
        }
        Command::Stats => {
            menu::print_statistics(&mut stdout, &manager.get_statistics())?;
        }
        Command::Clear { yes } => {
            if yes || confirm(&mut io::stdin().lock(), &mut stdout)? {
                manager.clear_all()?;
                println!("All vacancies deleted");
            } else {
                println!("Cancelled");
            }
        }
        Command::Menu => {
            drop(stdout);
            let mut menu = Menu::new(io::stdin().lock(), io::stdout());
            menu.run(manager).await?;
        }
    }

    Ok(())
}

fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "This deletes ALL vacancies. Are you sure? (y/n): ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

