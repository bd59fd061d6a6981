pub mod args;
pub mod cache;
pub mod error;
pub mod model;
pub mod storage;
pub mod controller {
    pub mod gate;
    pub mod season;
    pub mod sofascore;
}

pub use cache::{build_key, CacheStore, CACHE_DURATION};
pub use controller::gate::FetchGate;
pub use controller::season::{InvalidationPolicy, SeasonSelector};
pub use controller::sofascore::{ClientConfig, HttpGet, LigaClient, ReqwestHttp};
pub use error::CoreError;
