pub mod detector;
pub mod observer;
pub mod queue;
pub mod resolver;
pub mod runtime;

pub use observer::{InteractionObserver, ObserverRegistry};
pub use queue::{EventQueue, InteractionEvent};
pub use runtime::{random_population, EngineHandle, SimulationEngine};
