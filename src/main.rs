fn main() -> anyhow::Result<()> {
    vibeflicks::run()
}
