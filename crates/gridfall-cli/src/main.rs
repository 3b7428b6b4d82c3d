mod command;
mod score;
mod tui;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
