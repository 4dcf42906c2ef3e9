use std::process::ExitCode;

fn main() -> ExitCode {
    noweb_figures::cli::run()
}
