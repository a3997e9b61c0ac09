fn main() {
    if let Err(err) = slatrack_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
