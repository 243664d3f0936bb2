mod command;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env().init();
    command::run()
}
