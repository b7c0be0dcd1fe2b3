use tracing_subscriber::EnvFilter;

fn main() -> glib::ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("duotiles=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    duotiles::ui::app::run()
}
