use neonwave::{
    app::App,
    config::AppConfig,
    util::{hook::set_panic_hook, log::initialize_logging},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    setup()?;

    let mut app = App::new(AppConfig::from_env())?;
    app.run().await
}

fn setup() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    set_panic_hook();
    initialize_logging()
}
