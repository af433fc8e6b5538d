fn main() {
    oddo::cli::run();
}
