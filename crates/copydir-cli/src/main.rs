//! Binary entrypoint for the `copydir` command.

fn main() {
    std::process::exit(copydir_cli::run());
}
