use orrery::{AppError, SceneConfig, Viewer};

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::from_file(&path),
        None => Ok(SceneConfig::default()),
    };

    let result = config
        .map_err(AppError::from)
        .and_then(|config| Viewer::new(config).run());

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
