use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    folio::cli::main()
}
