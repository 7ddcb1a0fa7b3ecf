use cell_ngin::{Config, run};

fn main() -> anyhow::Result<()> {
    run(Config::default())
}
