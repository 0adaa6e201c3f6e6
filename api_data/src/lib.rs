pub mod settings;
pub mod store;

pub mod services {
    pub mod order;
    pub mod sequence;
    pub mod stats;
}
pub mod dtos {
    pub mod order;
}

pub use settings::Settings;
pub use store::DataStore;
