use polyres::ui::output;

fn main() {
    if let Err(err) = polyres::cli::run() {
        output::error(err);
        std::process::exit(1);
    }
}
