use umbra::{App, AppConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = AppConfig::from_env().and_then(|config| App::new(config).run());
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
