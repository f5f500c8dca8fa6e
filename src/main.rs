fn main() {
    if let Err(err) = simple_timeline::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
