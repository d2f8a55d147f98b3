// BoardCom - Serial console client for embedded device boards
use boardcom::cli::args::Args;
use boardcom::cli::commands::execute_command;
use clap::Parser;

fn main() {
    let args = Args::parse();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
