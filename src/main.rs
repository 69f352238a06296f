use std::{fs::File, panic, process::exit};

use agesnake::{config::Config, game, signals::Shutdown, term};
use log::{error, info, warn};
use simplelog::WriteLogger;

fn main() {
    let config = Config::from_env();
    init_logging(&config);
    install_panic_hook();

    info!("Starting with {:?}", config);

    let shutdown = Shutdown::new();
    if let Err(e) = shutdown.install() {
        warn!("Could not install signal handlers: {}", e);
    }

    // The game owns the terminal guard, so the terminal is already restored
    // by the time an error is reported here.
    let result = term::TermManager::new()
        .and_then(|term| game::SnakeGame::new(config, term, shutdown).play());

    if let Err(e) = result {
        error!("Terminal I/O failed: {}", e);
        eprintln!("agesnake: terminal error: {}", e);
        exit(1);
    }

    info!("Bye");
}

fn init_logging(config: &Config) {
    let path = match &config.log_file {
        Some(path) => path,
        None => return,
    };

    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("agesnake: cannot open log file {}: {}", path.display(), e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(config.log_level, simplelog::Config::default(), file) {
        eprintln!("agesnake: logging disabled: {}", e);
    }
}

// The default hook prints into the alternate screen, where nobody would see
// it. Restore first, then report.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        term::restore_terminal();
        default_hook(info);
    }));
}
