mod api;
mod events;

pub use api::DockerClient;
pub use events::monitor_events;
