use std::process::ExitCode;

use poetry_to_uv::main as poetry_to_uv_main;

fn main() -> ExitCode {
    poetry_to_uv_main(std::env::args_os())
}
