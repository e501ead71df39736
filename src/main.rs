mod cli;
mod commands;
mod descriptor;
mod env_loader;
mod error;
mod logging;
mod util;

fn main() {
    let dotenv = env_loader::load_dotenv();

    if let Err(err) = cli::run(dotenv) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
