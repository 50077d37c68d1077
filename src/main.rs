use std::process::ExitCode;

fn main() -> ExitCode {
    match boxtag::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
