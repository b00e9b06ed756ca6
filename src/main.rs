fn main() -> miette::Result<()> {
    loxtest::cli::run()?;
    Ok(())
}
