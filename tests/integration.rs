#[path = "integration/session.rs"]
mod session;
#[path = "integration/script.rs"]
mod script;
#[path = "integration/properties.rs"]
mod properties;
