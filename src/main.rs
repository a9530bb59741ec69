fn main() {
  if let Err(e) = polarization_lib::run() {
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }
}
