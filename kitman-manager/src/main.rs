fn main() -> anyhow::Result<()> {
    kitman_manager::run()
}
