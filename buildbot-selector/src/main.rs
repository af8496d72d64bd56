fn main() {
    let code = match buildbot_selector::run_cli() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR - {err:#}");
            buildbot_selector::failure_exit_code(&err)
        }
    };
    std::process::exit(code);
}
