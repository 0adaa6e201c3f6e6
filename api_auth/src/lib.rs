pub mod session;

pub mod dtos {
    pub mod auth;
}
pub(crate) mod services {
    pub(crate) mod auth;
    pub(crate) mod user;
}

pub use session::SessionManager;
