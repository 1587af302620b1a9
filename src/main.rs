fn main() {
    pulpconf::app::cli::run();
}
