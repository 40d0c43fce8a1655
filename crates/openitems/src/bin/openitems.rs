//! openitems - Send the open-items report.
//!
//! Primary binary, usually run from a scheduler.

fn main() -> std::process::ExitCode {
    openitems::cmd::job_cmd::main()
}
