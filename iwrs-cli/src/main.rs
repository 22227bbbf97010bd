fn main() -> anyhow::Result<()> {
    iwrs_cli::run()
}
