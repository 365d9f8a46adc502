use Chrfinder::Utils::load_from_file::load_task;
use Chrfinder::{ChromatoFinder, ResultsRegister, update_results};
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::error::Error;
use std::process::ExitCode;

fn run(task_file: &str) -> Result<(), Box<dyn Error>> {
    let task = load_task(task_file)?;
    let finder = ChromatoFinder::with_config(&task.store, task.config.clone())?;
    let register = ResultsRegister::new();

    let table = finder.get_properties_table(&task.mixture)?;
    table.pretty_print();
    let decision = finder.det_chromato(&table)?;
    decision.pretty_print();

    let id = update_results(&register, Some(task_file), decision, table)?;
    info!("result {} stored for '{}'", id, task_file);
    Ok(())
}

pub fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let level = if args.iter().any(|a| a == "-v" || a == "--verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);

    let Some(task_file) = args.iter().find(|a| !a.starts_with('-')) else {
        eprintln!("usage: Chrfinder [-v] <task_file>");
        return ExitCode::from(2);
    };
    match run(task_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
