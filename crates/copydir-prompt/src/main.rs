//! Binary entrypoint for the interactive `copydir-prompt` front-end.

fn main() {
    std::process::exit(copydir_prompt::run());
}
