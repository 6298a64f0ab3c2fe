use lazy_static::lazy_static;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

lazy_static! {
    static ref RUNTIME: Arc<Runtime> = {
        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("stratum-connector-native-postgres")
            .worker_threads(4)
            .build()
            .expect("Failed to build tokio runtime");

        Arc::new(runtime)
    };
}

pub(crate) fn runtime() -> Arc<Runtime> {
    Arc::clone(&RUNTIME)
}

/// The runtime driving the postgres client futures.
///
/// Blocking calls into the pool must not be made from within this runtime.
pub fn postgres_connector_runtime() -> Arc<Runtime> {
    runtime()
}
