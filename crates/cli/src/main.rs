fn main() {
    std::process::exit(swagger_ir_cli::run_cli(std::env::args().collect()));
}
