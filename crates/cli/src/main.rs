fn main() {
    if let Err(e) = liteworkspace_cli::run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
