fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match forklift_favourites::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[forklift] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = forklift_favourites::runtime::run_with_options(options) {
        eprintln!("[forklift] {error}");
        std::process::exit(1);
    }
}
