use std::fmt::Debug;

use log::trace;

/// Log if `Result` is an error
pub trait Logged {
    fn log(self) -> Self;
}

impl<T, E> Logged for Result<T, E>
where
    E: Debug,
{
    fn log(self) -> Self {
        if let Err(e) = &self {
            trace!("---TraceError--- {:#?}", e)
        }
        self
    }
}

pub trait Appliable
where
    Self: Sized,
{
    /**
     * Use `apply` if you need to access or mutate `self`
     */
    fn apply<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }
}

/**
 * `Appliable` be default is implemented for all sized types
 */
impl<T> Appliable for T where T: Sized {}

static LOGGER: std::sync::Once = std::sync::Once::new();

pub fn init_logger() {
    LOGGER.call_once(|| {
        dotenv::dotenv().ok();
        let modules = [
            "common_utils",
            "customer_registry",
            "registry_api",
            "registry_provider",
            "sql_provider",
        ];
        let module_logs = modules
            .into_iter()
            .map(|m| format!("{}=debug", m))
            .collect::<Vec<_>>()
            .join(",");
        let rust_log = format!("info,sqlx=warn,tiberius=warn,{}", module_logs);
        if std::env::var_os("RUST_LOG").is_none() {
            std::env::set_var("RUST_LOG", &rust_log);
        }
        tracing_subscriber::fmt::init();
    });
}
