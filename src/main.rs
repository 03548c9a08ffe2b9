use anyhow::Result;

use cord_explorer::app::InteractivePresenter;
use cord_explorer::config::Config;
use cord_explorer::present;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load()?;
    present::run(InteractivePresenter, &config)
}
