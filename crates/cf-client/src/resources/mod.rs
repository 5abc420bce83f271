//! Typed handles over the Cloud Controller resource collections.

mod apps;
mod domains;
mod events;
mod organizations;
mod routes;
mod service_bindings;
mod service_instances;
mod services;
mod spaces;

pub use apps::Apps;
pub use domains::Domains;
pub use events::Events;
pub use organizations::Organizations;
pub use routes::Routes;
pub use service_bindings::ServiceBindings;
pub use service_instances::ServiceInstances;
pub use services::{SERVICES_PAGE_SIZE, Services};
pub use spaces::Spaces;
